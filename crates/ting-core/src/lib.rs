//! # ting-core
//!
//! Ting 音频特征提取库的核心部分, 提供错误类型、PCM 采样编码和输出块缓冲.
//!
//! 其余 crate (`ting-format`, `ting-functional`) 都只依赖本 crate 的类型.

pub mod block;
pub mod error;
pub mod sample_format;

// 重导出常用类型
pub use block::AudioBlock;
pub use error::{TingError, TingResult};
pub use sample_format::PcmEncoding;
