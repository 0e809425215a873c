//! 输入模块
//!
//! 提供点击执行器抽象及其 enigo 实现
//!
//! # 子模块
//!
//! - [`error`] - 错误类型定义
//! - [`actuator`] - 点击执行器（点击、读取/设置指针位置）
//!
//! # 使用示例
//!
//! ```ignore
//! use humanclick_lib::input::{ClickActuator, EnigoActuator, MouseButton};
//!
//! let mut actuator = EnigoActuator::new()?;
//! actuator.click(MouseButton::Left, 1)?;
//! ```

pub mod actuator;
pub mod error;

pub use actuator::{ActuatorFactory, ClickActuator, EnigoActuator, MouseButton};
pub use error::{InputError, InputResult};
