//! 界面通知事件
//!
//! 后台点击循环和控制任务都不直接修改界面状态，所有界面可见的变化都以
//! [`ClickerEvent`] 的形式经由 [`StateManager`](super::StateManager) 排队发送，
//! 由界面所在的线程自行应用

use serde::Serialize;

use super::app_state::RunState;
use crate::hotkey::KeyOrButtonId;
use crate::utils::error::{AppError, ErrorContext};

/// 界面通知事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ClickerEvent {
    /// 运行状态变化（界面据此切换开始/停止按钮）
    RunStateChanged(RunState),

    /// 切换键已变更
    ToggleKeyChanged { label: String },

    /// 进入录制模式
    RecordingStarted { prompt: String },

    /// 需要展示给用户的错误
    Error(ErrorContext),
}

impl ClickerEvent {
    /// 由新绑定生成切换键变更事件
    pub fn toggle_key_changed(binding: &KeyOrButtonId) -> Self {
        Self::ToggleKeyChanged {
            label: format!("Toggle Key: {}", binding.label()),
        }
    }

    /// 由应用错误生成错误事件
    pub fn error(error: &AppError) -> Self {
        Self::Error(error.context())
    }

    /// 事件名称（用于日志）
    pub fn name(&self) -> &'static str {
        match self {
            Self::RunStateChanged(_) => "run_state_changed",
            Self::ToggleKeyChanged { .. } => "toggle_key_changed",
            Self::RecordingStarted { .. } => "recording_started",
            Self::Error(_) => "error",
        }
    }
}
