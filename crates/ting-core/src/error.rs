//! 统一错误类型定义.
//!
//! 所有 Ting crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// Ting 统一错误类型
#[derive(Debug, Error)]
pub enum TingError {
    /// 无效参数 (调用方违反前置条件)
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// 不支持的操作或格式
    #[error("不支持的操作: {0}")]
    Unsupported(String),

    /// 配置错误 (缺少必填项, 输出缓冲与流不匹配等)
    #[error("配置错误: {0}")]
    Config(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 无效数据 (损坏的文件头等)
    #[error("无效数据: {0}")]
    InvalidData(String),

    /// 内部错误 (不应发生)
    #[error("内部错误: {0}")]
    Internal(String),
}

/// Ting 统一 Result 类型
pub type TingResult<T> = Result<T, TingError>;
