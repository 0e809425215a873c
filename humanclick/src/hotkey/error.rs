//! 热键相关错误类型

use thiserror::Error;

/// 热键相关错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HotkeyError {
    /// 无效的绑定格式
    #[error("Invalid toggle binding '{0}': expected 'key:<name>' or 'button:<name>'")]
    InvalidFormat(String),

    /// 输入捕获启动失败
    #[error("Failed to start input capture: {0}")]
    CaptureFailed(String),

    /// 当前构建未启用全局输入捕获
    #[error("Input capture is not available in this build")]
    CaptureUnavailable,
}

/// 热键模块的结果类型
pub type HotkeyResult<T> = Result<T, HotkeyError>;
