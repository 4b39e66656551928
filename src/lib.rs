//! # Ting (听)
//!
//! 纯 Rust 实现的 PCM WAVE 流式读取与窗口分位数统计框架.
//!
//! Ting 由两个彼此独立的组件构成:
//! - **WAVE 源**: 解析规范 PCM WAVE 头, 按读取区间逐块输出归一化浮点样本
//! - **分位数统计**: 对一个已排序窗口计算四分位数、四分位距、百分位数与百分位距
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use ting::format::{WaveSource, WaveSourceConfig};
//! use ting::functional::{Functional, Percentiles, PercentilesConfig, SampleWindow};
//!
//! let mut source = WaveSource::open(&WaveSourceConfig::with_filename("speech.wav"))?;
//! let mut block = source.new_block();
//! let n = source.read_block(&mut block)?;
//!
//! let raw = &block.channel(0)[..n];
//! let mut sorted = raw.to_vec();
//! ting::functional::sort_ascending(&mut sorted);
//!
//! let stat = Percentiles::new(&PercentilesConfig::default());
//! let mut out = vec![0.0; stat.output_count()];
//! stat.process(&SampleWindow::new(raw, &sorted), &mut out)?;
//! # Ok::<(), ting::core::TingError>(())
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `ting-core` | 错误类型、PCM 采样编码、输出块 |
//! | `ting-format` | 字节流 I/O, WAVE 头解析, 区间与块解码 |
//! | `ting-functional` | 分位数统计量 |

/// 核心类型与工具
pub use ting_core as core;

/// WAVE PCM 源
pub use ting_format as format;

/// 窗口统计量
pub use ting_functional as functional;

/// 获取 Ting 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
