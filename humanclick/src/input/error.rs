//! 输入模块错误类型
//!
//! 定义点击执行器相关的错误类型

use thiserror::Error;

/// 输入操作错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// 辅助功能权限被拒绝
    #[error("Accessibility permission denied")]
    PermissionDenied,

    /// 执行器初始化失败
    #[error("Failed to initialize input simulation: {0}")]
    InitFailed(String),

    /// 点击失败
    #[error("Failed to click: {0}")]
    ClickFailed(String),

    /// 指针移动失败
    #[error("Failed to move pointer: {0}")]
    MoveFailed(String),

    /// 无法读取指针位置
    #[error("Failed to read pointer position: {0}")]
    PositionUnavailable(String),
}

/// 输入操作结果类型
pub type InputResult<T> = Result<T, InputError>;
