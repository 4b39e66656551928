//! 统计管线: 逐块读取 WAVE 源, 按声道汇总, 排序后计算分位数.

use std::path::Path;

use anyhow::{Context, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use ting_format::{WaveSource, WaveSourceConfig};
use ting_functional::{
    DiagnosticLevel, Functional, Percentiles, PercentilesConfig, SampleWindow, sort_ascending,
};

/// 配置文件, 两个可选段
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub source: WaveSourceConfig,
    pub percentiles: PercentilesConfig,
}

impl CliConfig {
    /// 读取 JSON 配置文件; 未指定时使用默认配置
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件 '{}'", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("无法解析配置文件 '{}'", path.display()))
    }
}

/// 一个输出值
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f32,
}

/// 单个声道的统计结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelStats {
    pub channel: usize,
    pub frames: usize,
    pub values: Vec<NamedValue>,
}

/// 完整统计报告
#[derive(Debug, Serialize)]
pub struct Report {
    pub filename: String,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// 样本编码名称, 无法识别时为空
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_format: Option<String>,
    pub mono_mixdown: bool,
    pub start_frame: u32,
    pub end_frame: u32,
    pub duration: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    pub stats: Vec<ChannelStats>,
}

/// 读完整个区间, 返回每个输出声道的样本
pub fn collect_channels(source: &mut WaveSource) -> anyhow::Result<Vec<Vec<f32>>> {
    let mut block = source.new_block();
    let expected = source.range().len() as usize;
    let mut channels: Vec<Vec<f32>> = (0..source.output_channels())
        .map(|_| Vec::with_capacity(expected))
        .collect();

    let mut nb_blocks = 0usize;
    loop {
        let n = source.read_block(&mut block).context("读取 PCM 数据块失败")?;
        if n > 0 {
            nb_blocks += 1;
            for (c, samples) in channels.iter_mut().enumerate() {
                samples.extend_from_slice(block.channel(c));
            }
        }
        if source.is_eof() {
            break;
        }
        if n == 0 {
            // 未到 EOF 却读不出数据: 采样格式无法解码, 后续每块都会如此
            bail!(
                "无法解码采样格式 (每样本字节={}, 位深={})",
                source.params().bytes_per_sample,
                source.params().bits_per_sample
            );
        }
    }

    debug!(
        "读取完成: {nb_blocks} 块, {} 帧",
        channels.first().map_or(0, Vec::len)
    );
    Ok(channels)
}

/// 对每个声道的样本计算统计量
pub fn channel_stats(
    channels: &[Vec<f32>],
    stat: &Percentiles,
) -> anyhow::Result<Vec<ChannelStats>> {
    let names = stat.value_names();
    let mut out = vec![0.0f32; stat.output_count()];
    let mut result = Vec::with_capacity(channels.len());

    for (c, raw) in channels.iter().enumerate() {
        let mut sorted = raw.clone();
        sort_ascending(&mut sorted);
        let n = stat
            .process(&SampleWindow::new(raw, &sorted), &mut out)
            .with_context(|| format!("声道 {c} 统计失败"))?;
        let values = names
            .iter()
            .zip(&out[..n])
            .map(|(name, &value)| NamedValue {
                name: name.clone(),
                value,
            })
            .collect();
        result.push(ChannelStats {
            channel: c,
            frames: raw.len(),
            values,
        });
    }
    Ok(result)
}

/// 按配置执行完整管线
pub fn run(config: &CliConfig) -> anyhow::Result<Report> {
    let stat = Percentiles::new(&config.percentiles);
    let diagnostics = stat
        .diagnostics()
        .iter()
        .map(|d| {
            let level = match d.level {
                DiagnosticLevel::Warning => "warning",
                DiagnosticLevel::Error => "error",
            };
            format!("{level}: {}: {}", d.key, d.message)
        })
        .collect();

    let mut source = WaveSource::open(&config.source).context("无法打开 WAVE 源")?;
    let params = *source.params();
    let range = source.range();
    let sample_format = params.encoding().ok().flatten().map(|e| e.to_string());
    info!(
        "输入: {} Hz, {} 声道, {} 位, 读取帧 [{}, {})",
        params.sample_rate,
        params.channels,
        params.bits_per_sample,
        range.start_frame,
        range.end_frame
    );

    let channels = collect_channels(&mut source)?;
    let stats = channel_stats(&channels, &stat)?;

    Ok(Report {
        filename: config
            .source
            .filename
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        sample_rate: params.sample_rate,
        channels: params.channels,
        bits_per_sample: params.bits_per_sample,
        sample_format,
        mono_mixdown: config.source.mono_mixdown,
        start_frame: range.start_frame,
        end_frame: range.end_frame,
        duration: source.duration(),
        diagnostics,
        stats,
    })
}
