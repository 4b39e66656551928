//! # ting-functional
//!
//! Ting 窗口统计量库: 对一个已排序的样本窗口计算四分位数、四分位距、
//! 任意百分位数以及百分位距.
//!
//! 排序由调用方完成, 本库从不排序.

pub mod config;
pub mod estimate;
pub mod functional;
pub mod percentiles;
pub mod window;

// 重导出常用类型
pub use config::{
    ConfigDiagnostic, DiagnosticLevel, FixedOutputs, PercentileRange, PercentilesConfig,
    StatConfig,
};
pub use estimate::Estimator;
pub use functional::Functional;
pub use percentiles::Percentiles;
pub use window::{SampleWindow, sort_ascending};
