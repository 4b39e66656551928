//! 四分位数与百分位统计量.
//!
//! 输出顺序固定:
//! 1. 已启用的 `quartile1`, `quartile2`, `quartile3`, `iqr1-2`, `iqr2-3`, `iqr1-3`
//! 2. 全部百分位 (按配置顺序), 名称形如 `percentile62.5`
//! 3. 全部百分位距, 名称形如 `pctlrange0-2`, 无效百分位距恒输出 0

use log::error;
use ting_core::{TingError, TingResult};

use crate::config::{
    ConfigDiagnostic, DiagnosticLevel, FixedOutputs, PercentileRange, PercentilesConfig, StatConfig,
};
use crate::functional::Functional;
use crate::window::SampleWindow;

/// 百分位输出的名称前缀
pub const PERCENTILE_NAME: &str = "percentile";
/// 百分位距输出的名称前缀
pub const PCTLRANGE_NAME: &str = "pctlrange";

/// 四分位数与百分位统计量
#[derive(Debug, Clone)]
pub struct Percentiles {
    config: StatConfig,
}

impl Percentiles {
    /// 从原始配置创建
    pub fn new(config: &PercentilesConfig) -> Self {
        Self::from_stat(StatConfig::resolve(config))
    }

    /// 从已解析的配置创建
    ///
    /// 不指向百分位列表中两个不同元素的百分位距会被置为无效, 并记录一条诊断.
    pub fn from_stat(mut config: StatConfig) -> Self {
        let n = config.percentiles.len();
        for (i, range) in config.ranges.iter_mut().enumerate() {
            if range.is_valid() && !range.fits(n) {
                let message = format!("'{range}' 越界或两端相同, 允许范围 [0..{n})");
                error!("百分位距 pctlrange[{i}] 无效: {message}");
                config.diagnostics.push(ConfigDiagnostic {
                    level: DiagnosticLevel::Error,
                    key: format!("pctlrange[{i}]"),
                    message,
                });
                *range = PercentileRange::INVALID;
            }
        }
        Self { config }
    }

    pub fn config(&self) -> &StatConfig {
        &self.config
    }

    /// 配置解析中产生的诊断
    pub fn diagnostics(&self) -> &[ConfigDiagnostic] {
        &self.config.diagnostics
    }

    /// 固定前缀的输出数量
    fn fixed_count(&self) -> usize {
        self.config.fixed.bits().count_ones() as usize
    }

    fn percentile_count(&self) -> usize {
        self.config.percentiles.len()
    }

    fn range_count(&self) -> usize {
        if self.config.ranges_enabled() {
            self.config.ranges.len()
        } else {
            0
        }
    }
}

impl Functional for Percentiles {
    fn name(&self) -> &'static str {
        "percentiles"
    }

    fn output_count(&self) -> usize {
        self.fixed_count() + self.percentile_count() + self.range_count()
    }

    fn value_name(&self, index: usize) -> Option<String> {
        let fixed = self.fixed_count();
        if index < fixed {
            return FixedOutputs::ORDERED
                .iter()
                .filter(|(flag, _)| self.config.fixed.contains(*flag))
                .nth(index)
                .map(|(_, name)| (*name).to_string());
        }

        let index = index - fixed;
        if let Some(p) = self.config.percentiles.get(index) {
            return Some(format!("{PERCENTILE_NAME}{:.1}", p * 100.0));
        }

        let index = index - self.percentile_count();
        if index < self.range_count() {
            let range = self.config.ranges[index];
            return Some(format!("{PCTLRANGE_NAME}{}-{}", range.a, range.b));
        }
        None
    }

    fn process(&self, window: &SampleWindow<'_>, out: &mut [f32]) -> TingResult<usize> {
        if window.is_empty() || out.is_empty() {
            return Ok(0);
        }
        let Some(sorted) = window.sorted() else {
            error!("percentiles: 需要升序窗口, 但未提供");
            return Err(TingError::InvalidArgument("缺少升序窗口".into()));
        };
        if sorted.len() != window.len() {
            return Err(TingError::InvalidArgument(format!(
                "升序窗口长度 {} 与原始窗口长度 {} 不一致",
                sorted.len(),
                window.len()
            )));
        }
        let needed = self.output_count();
        if out.len() < needed {
            return Err(TingError::InvalidArgument(format!(
                "输出缓冲过小: 需要 {needed}, 实际 {}",
                out.len()
            )));
        }

        let estimator = self.config.estimator;
        let q1 = estimator.estimate(0.25, sorted);
        let q2 = estimator.estimate(0.50, sorted);
        let q3 = estimator.estimate(0.75, sorted);

        let fixed_values = [q1, q2, q3, q2 - q1, q3 - q2, q3 - q1];
        let mut n = 0;
        for ((flag, _), value) in FixedOutputs::ORDERED.iter().zip(fixed_values) {
            if self.config.fixed.contains(*flag) {
                out[n] = value;
                n += 1;
            }
        }

        if self.config.percentiles_enabled() {
            let n0 = n;
            for &p in &self.config.percentiles {
                out[n] = estimator.estimate(p, sorted);
                n += 1;
            }
            if self.config.ranges_enabled() {
                for range in &self.config.ranges {
                    out[n] = if range.is_valid() {
                        let a = out[n0 + range.a as usize];
                        let b = out[n0 + range.b as usize];
                        (b - a).abs()
                    } else {
                        0.0
                    };
                    n += 1;
                }
            }
        }

        Ok(n)
    }
}
