//! WAVE 源配置.
//!
//! 由宿主在构建管线前一次性解析完成, 字段名与配置文件中的键保持一致.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::wav::RangeRequest;

/// 默认块时长 (秒)
pub const DEFAULT_BLOCKSIZE_SEC: f64 = 1.0;

/// WAVE 源配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaveSourceConfig {
    /// PCM WAVE 文件路径 (必填)
    pub filename: Option<PathBuf>,
    /// 将所有声道混为单声道
    pub mono_mixdown: bool,
    /// 读取起点 (秒)
    pub start: f64,
    /// 读取终点 (秒), 负数或未设置表示读到文件末尾
    pub end: Option<f64>,
    /// 距文件末尾的秒数 (仅在未设置终点时生效)
    pub endrel: Option<f64>,
    /// 读取起点 (采样数), 覆盖 `start`
    pub start_samples: Option<i64>,
    /// 读取终点 (采样数), 覆盖 `end` 和 `endrelSamples`
    pub end_samples: Option<i64>,
    /// 距文件末尾的采样数, 覆盖 `endrel`
    pub endrel_samples: Option<i64>,
    /// 每次读取的帧数, 覆盖 `blocksize_sec`
    pub blocksize: Option<u32>,
    /// 每次读取的时长 (秒)
    #[serde(rename = "blocksize_sec")]
    pub blocksize_sec: f64,
}

impl Default for WaveSourceConfig {
    fn default() -> Self {
        Self {
            filename: None,
            mono_mixdown: false,
            start: 0.0,
            end: None,
            endrel: None,
            start_samples: None,
            end_samples: None,
            endrel_samples: None,
            blocksize: None,
            blocksize_sec: DEFAULT_BLOCKSIZE_SEC,
        }
    }
}

impl WaveSourceConfig {
    /// 以文件路径创建默认配置
    pub fn with_filename(filename: impl Into<PathBuf>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Default::default()
        }
    }

    /// 提取读取区间请求
    pub fn range_request(&self) -> RangeRequest {
        RangeRequest {
            start: self.start,
            start_samples: self.start_samples,
            end: self.end,
            end_samples: self.end_samples,
            endrel: self.endrel,
            endrel_samples: self.endrel_samples,
        }
    }

    /// 每块帧数, 至少为 1
    ///
    /// 采样率为 0 时按 1.0 换算.
    pub fn block_frames(&self, sample_rate: u32) -> usize {
        let frames = match self.blocksize {
            Some(frames) => frames as usize,
            None => {
                let srate = if sample_rate == 0 {
                    1.0
                } else {
                    f64::from(sample_rate)
                };
                (self.blocksize_sec * srate).round().max(0.0) as usize
            }
        };
        frames.max(1)
    }
}
