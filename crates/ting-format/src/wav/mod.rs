//! RIFF/WAVE PCM 流式读取.
//!
//! - [`header`]: 44 字节规范头解析与非 data 块跳过
//! - [`range`]: 起止位置解析
//! - [`source`]: 按块读取并转换为浮点的 `WaveSource`

pub mod header;
pub mod range;
pub mod source;

pub use header::{WaveHeader, read_wave_header};
pub use range::{RangeRequest, ReadRange};
pub use source::{DecodeCursor, SourceState, WaveSource};

use ting_core::{PcmEncoding, TingResult};

/// PCM 流参数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PcmStreamParams {
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 声道数
    pub channels: u16,
    /// 位深
    pub bits_per_sample: u16,
    /// 每样本字节数 (`block_align / channels`)
    pub bytes_per_sample: u16,
    /// 每帧字节数 (所有声道)
    pub block_align: u16,
    /// 总帧数 (`data_size / block_align`)
    pub total_frames: u32,
    /// 第一个 PCM 样本在流中的偏移
    pub data_offset: u64,
}

impl From<&WaveHeader> for PcmStreamParams {
    fn from(head: &WaveHeader) -> Self {
        Self {
            sample_rate: head.sample_rate,
            channels: head.channels,
            bits_per_sample: head.bits_per_sample,
            bytes_per_sample: head.block_align / head.channels,
            block_align: head.block_align,
            total_frames: head.data_size / u32::from(head.block_align),
            data_offset: head.data_offset,
        }
    }
}

impl PcmStreamParams {
    /// 按每样本字节数和位深确定样本编码
    ///
    /// # 返回
    /// - `Ok(Some(_))`: 受支持且与 `block_align` 一致的编码
    /// - `Ok(None)`: 无法识别的组合, 或 `block_align` 不能整除为整样本
    /// - `Err(TingError::Unsupported)`: 3 字节紧凑打包
    pub fn encoding(&self) -> TingResult<Option<PcmEncoding>> {
        let encoding = PcmEncoding::from_layout(self.bytes_per_sample, self.bits_per_sample)?;
        Ok(encoding.filter(|enc| {
            enc.bytes_per_sample() * usize::from(self.channels) == usize::from(self.block_align)
        }))
    }
}
