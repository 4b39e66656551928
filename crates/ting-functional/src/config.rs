//! 分位数统计配置.
//!
//! `PercentilesConfig` 是宿主提供的原始配置 (键名与配置文件一致),
//! `StatConfig::resolve` 将其一次性解析为不可变的 `StatConfig`.
//! 可恢复的问题 (百分位越界、百分位距格式错误) 不会中止解析,
//! 而是记录为 `ConfigDiagnostic` 并写入日志.

use std::fmt;

use bitflags::bitflags;
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::estimate::Estimator;

bitflags! {
    /// 固定前缀输出的开关
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FixedOutputs: u8 {
        /// 第一四分位数
        const QUARTILE1 = 1 << 0;
        /// 中位数
        const QUARTILE2 = 1 << 1;
        /// 第三四分位数
        const QUARTILE3 = 1 << 2;
        /// q2 - q1
        const IQR12     = 1 << 3;
        /// q3 - q2
        const IQR23     = 1 << 4;
        /// q3 - q1
        const IQR13     = 1 << 5;

        /// 全部四分位数
        const QUARTILES = Self::QUARTILE1.bits() | Self::QUARTILE2.bits() | Self::QUARTILE3.bits();
        /// 全部四分位距
        const IQRS      = Self::IQR12.bits() | Self::IQR23.bits() | Self::IQR13.bits();
    }
}

impl FixedOutputs {
    /// 按输出顺序排列的固定输出及其名称
    pub const ORDERED: [(FixedOutputs, &'static str); 6] = [
        (Self::QUARTILE1, "quartile1"),
        (Self::QUARTILE2, "quartile2"),
        (Self::QUARTILE3, "quartile3"),
        (Self::IQR12, "iqr1-2"),
        (Self::IQR23, "iqr2-3"),
        (Self::IQR13, "iqr1-3"),
    ];
}

/// 宿主提供的原始配置
///
/// 布尔开关使用 `Option<bool>` 表示三态: 未设置 / 设为假 / 设为真.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentilesConfig {
    /// 全部四分位数开关 (显式设置时覆盖单项)
    pub quartiles: Option<bool>,
    pub quartile1: Option<bool>,
    pub quartile2: Option<bool>,
    pub quartile3: Option<bool>,
    /// 全部四分位距开关 (显式设置时覆盖单项)
    pub iqr: Option<bool>,
    pub iqr12: Option<bool>,
    pub iqr23: Option<bool>,
    pub iqr13: Option<bool>,
    /// 百分位 (0..1)
    pub percentile: Vec<f64>,
    /// 百分位距 "A-B", A/B 为 `percentile` 中的下标
    pub pctlrange: Vec<String>,
    /// 线性插值 (否则取最近下标)
    pub interp: bool,
}

impl Default for PercentilesConfig {
    fn default() -> Self {
        Self {
            quartiles: None,
            quartile1: None,
            quartile2: None,
            quartile3: None,
            iqr: None,
            iqr12: None,
            iqr23: None,
            iqr13: None,
            percentile: Vec::new(),
            pctlrange: Vec::new(),
            interp: true,
        }
    }
}

/// 百分位距, 两个下标指向百分位列表
///
/// 无效的百分位距以哨兵值 `(-1, -1)` 保存, 输出恒为 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentileRange {
    pub a: i32,
    pub b: i32,
}

impl PercentileRange {
    /// 无效哨兵
    pub const INVALID: Self = Self { a: -1, b: -1 };

    /// 是否为有效的百分位距
    pub fn is_valid(&self) -> bool {
        self.a >= 0 && self.b >= 0
    }

    /// 两端是否都指向长度为 `n_percentiles` 的百分位列表中的不同元素
    pub fn fits(&self, n_percentiles: usize) -> bool {
        self.is_valid()
            && (self.a as usize) < n_percentiles
            && (self.b as usize) < n_percentiles
            && self.a != self.b
    }

    /// 解析 "A-B" 形式的百分位距
    ///
    /// `n_percentiles` 为百分位列表长度, 要求 `0 <= A, B < n_percentiles` 且 `A != B`.
    pub fn parse(token: &str, n_percentiles: usize) -> Result<Self, String> {
        let (a, b) = token
            .split_once('-')
            .ok_or_else(|| format!("'{token}' 缺少 '-', 格式应为 X-Y"))?;
        let a: i32 = a
            .trim()
            .parse()
            .map_err(|_| format!("'{token}' 中的 X 不是整数, 格式应为 X-Y"))?;
        let b: i32 = b
            .trim()
            .parse()
            .map_err(|_| format!("'{token}' 中的 Y 不是整数, 格式应为 X-Y"))?;

        let limit = n_percentiles as i64;
        for (label, v) in [("X", a), ("Y", b)] {
            if v < 0 || i64::from(v) >= limit {
                return Err(format!(
                    "'{token}' 中的 {label} (={v}) 越界, 允许范围 [0..{limit})"
                ));
            }
        }
        if a == b {
            return Err(format!("'{token}' 中 X 必须不等于 Y"));
        }
        Ok(Self { a, b })
    }
}

impl fmt::Display for PercentileRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.a, self.b)
    }
}

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Warning,
    Error,
}

/// 配置解析中的可恢复问题
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDiagnostic {
    /// 级别
    pub level: DiagnosticLevel,
    /// 出问题的配置键, 如 `percentile[2]`
    pub key: String,
    /// 描述
    pub message: String,
}

/// 解析完成的统计配置
#[derive(Debug, Clone, PartialEq)]
pub struct StatConfig {
    /// 启用的固定输出
    pub fixed: FixedOutputs,
    /// 百分位, 已截断到 [0, 1]
    pub percentiles: Vec<f64>,
    /// 百分位距
    pub ranges: Vec<PercentileRange>,
    /// 百分位估计方法
    pub estimator: Estimator,
    /// 解析过程中的诊断
    pub diagnostics: Vec<ConfigDiagnostic>,
}

/// 解析一组开关: 单项默认开启且只能开启, 显式设置的总开关覆盖全部单项
fn resolve_group(
    aggregate: Option<bool>,
    items: [(Option<bool>, FixedOutputs); 3],
    all: FixedOutputs,
) -> FixedOutputs {
    let mut enabled = all;
    for (item, flag) in items {
        if item == Some(true) {
            enabled |= flag;
        }
    }
    match aggregate {
        Some(true) => all,
        Some(false) => FixedOutputs::empty(),
        None => enabled,
    }
}

impl StatConfig {
    /// 从原始配置解析
    pub fn resolve(config: &PercentilesConfig) -> Self {
        let mut diagnostics = Vec::new();

        let quartiles = resolve_group(
            config.quartiles,
            [
                (config.quartile1, FixedOutputs::QUARTILE1),
                (config.quartile2, FixedOutputs::QUARTILE2),
                (config.quartile3, FixedOutputs::QUARTILE3),
            ],
            FixedOutputs::QUARTILES,
        );
        let iqrs = resolve_group(
            config.iqr,
            [
                (config.iqr12, FixedOutputs::IQR12),
                (config.iqr23, FixedOutputs::IQR23),
                (config.iqr13, FixedOutputs::IQR13),
            ],
            FixedOutputs::IQRS,
        );

        let percentiles: Vec<f64> = config
            .percentile
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                if (0.0..=1.0).contains(&p) {
                    return p;
                }
                let clamped = if p < 0.0 { 0.0 } else { 1.0 };
                let message = format!("百分位 {p} 超出 [0..1], 截断为 {clamped:.1}");
                warn!("percentile[{i}]: {message}");
                diagnostics.push(ConfigDiagnostic {
                    level: DiagnosticLevel::Warning,
                    key: format!("percentile[{i}]"),
                    message,
                });
                clamped
            })
            .collect();

        let mut ranges = Vec::new();
        if percentiles.is_empty() {
            if !config.pctlrange.is_empty() {
                let message = "未配置任何百分位, 忽略全部百分位距".to_string();
                warn!("pctlrange: {message}");
                diagnostics.push(ConfigDiagnostic {
                    level: DiagnosticLevel::Warning,
                    key: "pctlrange".into(),
                    message,
                });
            }
        } else {
            for (i, token) in config.pctlrange.iter().enumerate() {
                let range = match PercentileRange::parse(token, percentiles.len()) {
                    Ok(range) => range,
                    Err(message) => {
                        error!("解析百分位距 pctlrange[{i}] 失败: {message}");
                        diagnostics.push(ConfigDiagnostic {
                            level: DiagnosticLevel::Error,
                            key: format!("pctlrange[{i}]"),
                            message,
                        });
                        PercentileRange::INVALID
                    }
                };
                ranges.push(range);
            }
        }

        Self {
            fixed: quartiles | iqrs,
            percentiles,
            ranges,
            estimator: Estimator::from_interp(config.interp),
            diagnostics,
        }
    }

    /// 是否输出百分位
    pub fn percentiles_enabled(&self) -> bool {
        !self.percentiles.is_empty()
    }

    /// 是否输出百分位距
    pub fn ranges_enabled(&self) -> bool {
        self.percentiles_enabled() && !self.ranges.is_empty()
    }
}
