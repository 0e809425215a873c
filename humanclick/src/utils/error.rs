//! 全局错误处理模块
//!
//! 聚合各模块的错误类型，提供错误代码、用户友好的错误消息和恢复建议。
//! 控制任务把 [`AppError`] 转换为 [`ErrorContext`] 后发送给界面。
//!
//! # 使用示例
//!
//! ```
//! use humanclick_lib::session::SessionError;
//! use humanclick_lib::utils::error::{AppError, ErrorCode};
//!
//! let err = AppError::from(SessionError::NoToggleKeySet);
//! assert_eq!(err.code(), ErrorCode::NoToggleKeySet);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hotkey::HotkeyError;
use crate::input::InputError;
use crate::session::SessionError;
use crate::state::{ConfigError, StateError};
use crate::timing::IntervalError;

/// 应用错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 点击频率错误
    #[error("Interval error: {0}")]
    Interval(#[from] IntervalError),

    /// 会话错误
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// 输入错误
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// 热键错误
    #[error("Hotkey error: {0}")]
    Hotkey(#[from] HotkeyError),

    /// 状态错误
    #[error("State error: {0}")]
    State(#[from] StateError),
}

/// 错误代码
///
/// 用于界面识别和处理特定错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // 频率
    /// 点击频率超出范围
    InvalidRate,

    // 会话
    /// 未设置切换键
    NoToggleKeySet,
    /// 已在运行
    SessionAlreadyRunning,
    /// 未在运行
    SessionNotRunning,
    /// 点击循环停止超时
    StopTimeout,
    /// 上一个点击循环仍在退出
    LoopStillAlive,
    /// 无法创建点击线程
    SpawnFailed,
    /// 点击循环崩溃
    LoopCrashed,
    /// 控制通道关闭
    ChannelClosed,

    // 输入
    /// 辅助功能权限被拒绝
    InputPermissionDenied,
    /// 执行器故障
    ActuatorFailure,

    // 配置
    /// 配置加载失败
    ConfigLoadFailed,
    /// 配置无效
    ConfigInvalid,

    // 热键
    /// 绑定格式错误
    InvalidBinding,
    /// 全局输入监听失败
    CaptureFailed,

    // 状态
    /// 非法状态转换
    InvalidTransition,
}

/// 错误上下文信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// 错误代码
    pub code: ErrorCode,
    /// 用户友好的错误消息
    pub message: String,
    /// 详细错误信息（用于日志）
    pub detail: Option<String>,
    /// 恢复建议
    pub recovery_hint: Option<String>,
    /// 是否可恢复
    pub recoverable: bool,
}

impl ErrorContext {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: None,
            recovery_hint: None,
            recoverable: true,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_recovery_hint(mut self, hint: impl Into<String>) -> Self {
        self.recovery_hint = Some(hint.into());
        self
    }

    pub fn not_recoverable(mut self) -> Self {
        self.recoverable = false;
        self
    }
}

fn input_code(error: &InputError) -> ErrorCode {
    match error {
        InputError::PermissionDenied => ErrorCode::InputPermissionDenied,
        _ => ErrorCode::ActuatorFailure,
    }
}

impl AppError {
    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Interval(IntervalError::InvalidRate { .. }) => ErrorCode::InvalidRate,

            AppError::Session(SessionError::NoToggleKeySet) => ErrorCode::NoToggleKeySet,
            AppError::Session(SessionError::AlreadyRunning) => ErrorCode::SessionAlreadyRunning,
            AppError::Session(SessionError::NotRunning) => ErrorCode::SessionNotRunning,
            AppError::Session(SessionError::StopTimeout(_)) => ErrorCode::StopTimeout,
            AppError::Session(SessionError::LoopStillAlive) => ErrorCode::LoopStillAlive,
            AppError::Session(SessionError::InvalidRate(_)) => ErrorCode::InvalidRate,
            AppError::Session(SessionError::SpawnFailed(_)) => ErrorCode::SpawnFailed,
            AppError::Session(SessionError::ActuatorFailure(e)) => input_code(e),
            AppError::Session(SessionError::LoopCrashed(_)) => ErrorCode::LoopCrashed,
            AppError::Session(SessionError::ChannelClosed) => ErrorCode::ChannelClosed,

            AppError::Input(e) => input_code(e),

            AppError::Config(ConfigError::Io(_)) => ErrorCode::ConfigLoadFailed,
            AppError::Config(ConfigError::Rate(_)) => ErrorCode::InvalidRate,
            AppError::Config(_) => ErrorCode::ConfigInvalid,

            AppError::Hotkey(HotkeyError::InvalidFormat(_)) => ErrorCode::InvalidBinding,
            AppError::Hotkey(_) => ErrorCode::CaptureFailed,

            AppError::State(_) => ErrorCode::InvalidTransition,
        }
    }

    /// 获取用户友好的错误消息
    pub fn user_message(&self) -> String {
        match self {
            AppError::Interval(IntervalError::InvalidRate { cps })
            | AppError::Session(SessionError::InvalidRate(IntervalError::InvalidRate { cps })) => {
                format!("点击频率 {} 无效，请输入 1 到 20 之间的数值", cps)
            }

            AppError::Session(SessionError::NoToggleKeySet) => {
                "请先设置切换键".to_string()
            }
            AppError::Session(SessionError::AlreadyRunning) => {
                "点击已在运行".to_string()
            }
            AppError::Session(SessionError::NotRunning) => {
                "点击未在运行".to_string()
            }
            AppError::Session(SessionError::StopTimeout(ms)) => {
                format!("点击循环未能在 {}ms 内停止", ms)
            }
            AppError::Session(SessionError::LoopStillAlive) => {
                "上一次点击仍在停止中，请稍后再试".to_string()
            }
            AppError::Session(SessionError::ActuatorFailure(InputError::PermissionDenied)) => {
                "需要辅助功能权限才能模拟点击".to_string()
            }
            AppError::Session(SessionError::ActuatorFailure(_)) => {
                "模拟点击失败，点击已停止".to_string()
            }
            AppError::Session(_) => {
                "点击会话出错，请重试".to_string()
            }

            AppError::Input(InputError::PermissionDenied) => {
                "需要辅助功能权限才能模拟点击".to_string()
            }
            AppError::Input(_) => {
                "模拟点击失败".to_string()
            }

            AppError::Config(ConfigError::Io(_)) => {
                "无法读取配置文件".to_string()
            }
            AppError::Config(ConfigError::Json(_)) => {
                "配置文件格式错误".to_string()
            }
            AppError::Config(_) => {
                "配置错误".to_string()
            }

            AppError::Hotkey(HotkeyError::InvalidFormat(_)) => {
                "切换键格式错误".to_string()
            }
            AppError::Hotkey(_) => {
                "无法监听全局按键".to_string()
            }

            AppError::State(_) => {
                "状态错误，请重试".to_string()
            }
        }
    }

    /// 获取完整的错误上下文
    pub fn context(&self) -> ErrorContext {
        let mut ctx = ErrorContext::new(self.code(), self.user_message())
            .with_detail(self.to_string());

        ctx.recovery_hint = self.recovery_hint();

        if !self.is_recoverable() {
            ctx = ctx.not_recoverable();
        }

        ctx
    }

    /// 获取恢复建议
    pub fn recovery_hint(&self) -> Option<String> {
        match self {
            AppError::Session(SessionError::NoToggleKeySet) => {
                Some("点击“录制切换键”，然后按下任意键或鼠标按钮".to_string())
            }
            AppError::Interval(_)
            | AppError::Config(ConfigError::Rate(_))
            | AppError::Session(SessionError::InvalidRate(_)) => {
                Some("点击频率范围为 1 到 20 次/秒".to_string())
            }
            AppError::Input(InputError::PermissionDenied)
            | AppError::Session(SessionError::ActuatorFailure(InputError::PermissionDenied)) => {
                Some("请在系统设置中为 HumanClick 开启辅助功能权限".to_string())
            }
            AppError::Hotkey(HotkeyError::CaptureUnavailable) => {
                Some("请使用启用了 hooks 特性的版本".to_string())
            }
            _ => None,
        }
    }

    /// 检查错误是否可恢复
    ///
    /// 配置错误需要修改配置后重启
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = AppError::from(IntervalError::InvalidRate { cps: 30.0 });
        assert_eq!(err.code(), ErrorCode::InvalidRate);

        let err = AppError::from(SessionError::NoToggleKeySet);
        assert_eq!(err.code(), ErrorCode::NoToggleKeySet);

        let err = AppError::from(SessionError::ActuatorFailure(InputError::ClickFailed(
            "x".to_string(),
        )));
        assert_eq!(err.code(), ErrorCode::ActuatorFailure);

        let err = AppError::from(SessionError::ActuatorFailure(InputError::PermissionDenied));
        assert_eq!(err.code(), ErrorCode::InputPermissionDenied);

        let err = AppError::from(SessionError::InvalidRate(IntervalError::InvalidRate {
            cps: 0.0,
        }));
        assert_eq!(err.code(), ErrorCode::InvalidRate);
        assert!(err.recovery_hint().is_some());

        let err = AppError::from(HotkeyError::InvalidFormat("f6".to_string()));
        assert_eq!(err.code(), ErrorCode::InvalidBinding);
    }

    #[test]
    fn test_user_message() {
        let err = AppError::from(SessionError::NoToggleKeySet);
        assert!(err.user_message().contains("切换键"));

        let err = AppError::from(IntervalError::InvalidRate { cps: 0.5 });
        assert!(err.user_message().contains("0.5"));

        let err = AppError::Input(InputError::PermissionDenied);
        assert!(err.user_message().contains("权限"));
    }

    #[test]
    fn test_error_context() {
        let ctx = AppError::from(SessionError::NoToggleKeySet).context();

        assert_eq!(ctx.code, ErrorCode::NoToggleKeySet);
        assert!(!ctx.message.is_empty());
        assert_eq!(ctx.detail.as_deref(), Some("Session error: No toggle key set"));
        assert!(ctx.recovery_hint.is_some());
        assert!(ctx.recoverable);
    }

    #[test]
    fn test_recoverable() {
        assert!(AppError::from(SessionError::StopTimeout(1000)).is_recoverable());

        let err = AppError::from(ConfigError::Invalid("bad".to_string()));
        assert!(!err.is_recoverable());
        assert!(!err.context().recoverable);
    }

    #[test]
    fn test_error_code_serialization() {
        let json = serde_json::to_string(&ErrorCode::NoToggleKeySet).unwrap();
        assert_eq!(json, "\"NO_TOGGLE_KEY_SET\"");

        let deserialized: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, ErrorCode::NoToggleKeySet);
    }

    #[test]
    fn test_error_context_serialization() {
        let ctx = ErrorContext::new(ErrorCode::StopTimeout, "Test message")
            .with_detail("Detailed error")
            .with_recovery_hint("Try again");

        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("STOP_TIMEOUT"));

        let deserialized: ErrorContext = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, ctx);
    }
}
