//! PCM 采样编码定义.
//!
//! 描述 WAVE 文件中整数 PCM 样本的打包方式, 以及归一化到浮点时使用的除数.

use std::fmt;

use crate::error::{TingError, TingResult};

/// 整数 PCM 采样编码
///
/// 由 `block_align / channels` 得到的每样本字节数和 `bits_per_sample` 共同决定.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PcmEncoding {
    /// 有符号 8 位
    S8,
    /// 有符号 16 位, 小端
    S16,
    /// 24 位有效数据打包在 4 字节小端字中 (取低 24 位)
    S24In32,
    /// 有符号 32 位, 小端
    S32,
}

impl PcmEncoding {
    /// 根据每样本字节数和位深确定编码
    ///
    /// # 返回
    /// - `Ok(Some(_))`: 受支持的编码
    /// - `Ok(None)`: 无法识别的组合 (调用方按软错误处理)
    /// - `Err(TingError::Unsupported)`: 3 字节紧凑打包, 不支持
    pub fn from_layout(bytes_per_sample: u16, bits_per_sample: u16) -> TingResult<Option<Self>> {
        match (bytes_per_sample, bits_per_sample) {
            (1, _) => Ok(Some(Self::S8)),
            (2, _) => Ok(Some(Self::S16)),
            (3, _) => Err(TingError::Unsupported(
                "每样本 3 字节的 24 位 WAVE 编码尚未实现".into(),
            )),
            (4, 24) => Ok(Some(Self::S24In32)),
            (4, 32) => Ok(Some(Self::S32)),
            _ => Ok(None),
        }
    }

    /// 每个样本占用的字节数
    pub const fn bytes_per_sample(&self) -> usize {
        match self {
            Self::S8 => 1,
            Self::S16 => 2,
            Self::S24In32 | Self::S32 => 4,
        }
    }

    /// 归一化除数
    pub const fn divisor(&self) -> f64 {
        match self {
            Self::S8 => 127.0,
            Self::S16 => 32767.0,
            Self::S24In32 => 32767.0 * 256.0,
            Self::S32 => 32767.0 * 32767.0 * 2.0,
        }
    }
}

impl fmt::Display for PcmEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::S8 => "s8",
            Self::S16 => "s16le",
            Self::S24In32 => "s24in32le",
            Self::S32 => "s32le",
        };
        write!(f, "{name}")
    }
}
