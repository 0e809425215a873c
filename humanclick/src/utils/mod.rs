/// 日志初始化
pub mod logging;

/// 全局错误处理
pub mod error;

pub use error::{AppError, ErrorCode, ErrorContext};

#[cfg(test)]
mod logging_test;
