//! 会话相关错误类型

use thiserror::Error;

use crate::input::InputError;
use crate::timing::IntervalError;

/// 会话错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// 未设置切换键
    #[error("No toggle key set")]
    NoToggleKeySet,

    /// 点击已经在运行
    #[error("Clicking is already running")]
    AlreadyRunning,

    /// 点击未运行
    #[error("Clicking is not running")]
    NotRunning,

    /// 点击循环未在限定时间内退出
    #[error("Click loop did not exit within {0}ms")]
    StopTimeout(u64),

    /// 上一个点击循环仍在退出中
    #[error("Previous click loop is still shutting down")]
    LoopStillAlive,

    /// 会话中的点击频率无效
    #[error(transparent)]
    InvalidRate(#[from] IntervalError),

    /// 无法创建点击线程
    #[error("Failed to spawn click loop: {0}")]
    SpawnFailed(String),

    /// 执行器故障导致点击循环终止
    #[error("Actuator failure: {0}")]
    ActuatorFailure(#[from] InputError),

    /// 点击循环异常退出
    #[error("Click loop crashed: {0}")]
    LoopCrashed(String),

    /// 控制通道已关闭
    #[error("Session controller channel closed")]
    ChannelClosed,
}

/// 会话模块的结果类型
pub type SessionResult<T> = Result<T, SessionError>;
