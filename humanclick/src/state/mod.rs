//! 状态管理模块
//!
//! 提供运行状态、界面通知和配置
//!
//! # 模块结构
//!
//! - `app_state` - 运行状态定义和状态管理器
//! - `error` - 状态相关错误类型
//! - `events` - 发送给界面的通知事件
//! - `config` - 点击器配置

mod app_state;
pub mod config;
mod error;
mod events;

pub use app_state::{RunState, StateManager};
pub use config::{ClickerConfig, ConfigError, ConfigResult};
pub use error::{StateError, StateResult};
pub use events::ClickerEvent;
