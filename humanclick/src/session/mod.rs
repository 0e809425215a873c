//! 点击会话模块
//!
//! - `state_machine` - `Idle ⇄ Running` 会话状态机
//! - `worker` - 后台点击循环
//! - `controller` - 串行处理界面命令和输入事件的控制任务
//! - `error` - 会话错误类型

mod controller;
mod error;
mod state_machine;
mod worker;

pub use controller::{ClickController, ControlHandle, UiCommand};
pub use error::{SessionError, SessionResult};
pub use state_machine::ClickSession;
pub use worker::LoopExit;
