//! 切换键分发器
//!
//! 将输入事件映射为会话动作。分发器有两种模式：
//!
//! - **Normal** - 与当前绑定相等的按下事件触发一次切换，其余事件忽略
//! - **Recording** - 下一个按键或鼠标按下事件被捕获为新的绑定，随后回到 Normal
//!
//! 分发器本身不持有绑定，绑定属于会话；这里只做纯粹的判定

use super::binding::{InputEvent, KeyOrButtonId};

/// 录制提示文本
pub const RECORDING_PROMPT: &str = "Press any key or mouse button...";

/// 分发模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    #[default]
    Normal,
    Recording,
}

/// 分发结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchAction {
    /// 忽略该事件
    Ignore,
    /// 触发一次启动/停止切换
    Toggle,
    /// 录制到新的绑定
    BindingCaptured(KeyOrButtonId),
}

/// 切换键分发器
#[derive(Debug, Default)]
pub struct ToggleDispatcher {
    mode: DispatchMode,
}

impl ToggleDispatcher {
    /// 创建处于 Normal 模式的分发器
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前模式
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// 是否处于录制模式
    pub fn is_recording(&self) -> bool {
        self.mode == DispatchMode::Recording
    }

    /// 请求进入录制模式
    ///
    /// 幂等：已在录制时不产生任何变化。返回是否为新进入
    ///
    /// # Examples
    ///
    /// ```
    /// use humanclick_lib::hotkey::ToggleDispatcher;
    ///
    /// let mut dispatcher = ToggleDispatcher::new();
    /// assert!(dispatcher.request_recording());
    /// assert!(!dispatcher.request_recording());
    /// assert!(dispatcher.is_recording());
    /// ```
    pub fn request_recording(&mut self) -> bool {
        if self.is_recording() {
            tracing::debug!("Already recording toggle binding");
            return false;
        }

        self.mode = DispatchMode::Recording;
        tracing::info!("Recording new toggle binding");
        true
    }

    /// 处理一个输入事件
    ///
    /// * `binding` - 会话当前的切换键绑定
    pub fn dispatch(
        &mut self,
        event: &InputEvent,
        binding: Option<&KeyOrButtonId>,
    ) -> DispatchAction {
        if !event.is_press() {
            return DispatchAction::Ignore;
        }

        match self.mode {
            DispatchMode::Recording => {
                self.mode = DispatchMode::Normal;
                tracing::info!(binding = %event.id, "Captured toggle binding");
                DispatchAction::BindingCaptured(event.id.clone())
            }
            DispatchMode::Normal => {
                if binding == Some(&event.id) {
                    tracing::debug!(binding = %event.id, "Toggle binding pressed");
                    DispatchAction::Toggle
                } else {
                    DispatchAction::Ignore
                }
            }
        }
    }
}
