//! 热键模块
//!
//! 提供切换键绑定、输入事件定义和切换键分发功能
//!
//! # 功能
//!
//! - 切换键：按下绑定的按键或鼠标按钮启动/停止点击
//! - 录制模式：捕获下一个按下的按键或按钮作为新的切换键
//! - 全局输入捕获（`hooks` feature）：把系统键鼠事件转换为 [`InputEvent`]
//!
//! # 使用方法
//!
//! ```
//! use humanclick_lib::hotkey::{DispatchAction, InputEvent, KeyOrButtonId, ToggleDispatcher};
//!
//! let mut dispatcher = ToggleDispatcher::new();
//! let binding = KeyOrButtonId::button("Middle");
//!
//! let action = dispatcher.dispatch(&InputEvent::button_press("Middle"), Some(&binding));
//! assert_eq!(action, DispatchAction::Toggle);
//! ```

mod binding;
#[cfg(feature = "hooks")]
mod capture;
mod dispatcher;
mod error;

pub use binding::{InputEvent, InputEventKind, KeyOrButtonId};
#[cfg(feature = "hooks")]
pub use capture::{spawn_input_capture, translate_event};
pub use dispatcher::{DispatchAction, DispatchMode, RECORDING_PROMPT, ToggleDispatcher};
pub use error::{HotkeyError, HotkeyResult};
