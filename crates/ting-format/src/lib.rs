//! # ting-format
//!
//! Ting 的 RIFF/WAVE PCM 流式读取库.
//!
//! 解析规范 PCM WAVE 头, 解析读取区间, 然后按块把整数 PCM 转换为归一化浮点,
//! 可选混为单声道. 不支持压缩格式和 3 字节紧凑打包的 24 位样本.

pub mod config;
pub mod io;
pub mod pcm;
pub mod wav;

// 重导出常用类型
pub use config::WaveSourceConfig;
pub use io::{IoBackend, IoContext, MemoryBackend};
pub use wav::{DecodeCursor, PcmStreamParams, RangeRequest, ReadRange, SourceState, WaveSource};
