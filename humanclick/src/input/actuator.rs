//! 点击执行器
//!
//! 会话只通过 [`ClickActuator`] 与系统交互：点击、读取指针位置、设置指针位置。
//! 默认实现 [`EnigoActuator`] 基于 enigo 库
//!
//! # 平台支持
//!
//! | 平台 | 点击 | 指针移动 | 备注 |
//! |------|------|----------|------|
//! | Windows | ✅ | ✅ | 无需特殊权限 |
//! | macOS | ✅ | ✅ | 需要辅助功能权限 |
//! | Linux (X11) | ✅ | ✅ | 需要 X11 |
//! | Linux (Wayland) | ⚠️ | ⚠️ | 受限支持 |

use std::sync::Arc;

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};
use serde::{Deserialize, Serialize};

use super::error::{InputError, InputResult};
use crate::timing::PointerOffset;

/// 鼠标按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl From<MouseButton> for Button {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        }
    }
}

/// 指针/点击执行器
///
/// 只在后台点击循环中使用，因此不要求 `Send`
pub trait ClickActuator {
    /// 点击 `count` 次
    fn click(&mut self, button: MouseButton, count: u32) -> InputResult<()>;

    /// 当前指针位置
    fn position(&self) -> InputResult<(i32, i32)>;

    /// 将指针移动到绝对位置
    fn set_position(&mut self, x: i32, y: i32) -> InputResult<()>;

    /// 以当前位置为起点相对移动指针，返回移动后的位置
    fn move_by(&mut self, offset: PointerOffset) -> InputResult<(i32, i32)> {
        let (x, y) = offset.apply(self.position()?);
        self.set_position(x, y)?;
        Ok((x, y))
    }
}

/// 执行器工厂
///
/// 执行器在点击线程内部创建，因此只需要工厂本身可以跨线程传递
pub type ActuatorFactory = Arc<dyn Fn() -> InputResult<Box<dyn ClickActuator>> + Send + Sync>;

/// 基于 enigo 的执行器
pub struct EnigoActuator {
    enigo: Enigo,
}

impl EnigoActuator {
    /// 创建执行器
    ///
    /// # Errors
    ///
    /// - `InputError::PermissionDenied` - macOS 未授予辅助功能权限
    /// - `InputError::InitFailed` - enigo 初始化失败
    pub fn new() -> InputResult<Self> {
        #[cfg(target_os = "macos")]
        if !macos_accessibility_client::accessibility::application_is_trusted_with_prompt() {
            tracing::warn!("Accessibility permission not granted");
            return Err(InputError::PermissionDenied);
        }

        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| InputError::InitFailed(e.to_string()))?;

        tracing::debug!("Click actuator initialized");

        Ok(Self { enigo })
    }

    /// 创建 enigo 执行器工厂
    pub fn factory() -> ActuatorFactory {
        Arc::new(|| Ok(Box::new(EnigoActuator::new()?) as Box<dyn ClickActuator>))
    }
}

impl ClickActuator for EnigoActuator {
    fn click(&mut self, button: MouseButton, count: u32) -> InputResult<()> {
        for _ in 0..count {
            self.enigo
                .button(button.into(), Direction::Click)
                .map_err(|e| InputError::ClickFailed(e.to_string()))?;
        }
        Ok(())
    }

    fn position(&self) -> InputResult<(i32, i32)> {
        self.enigo
            .location()
            .map_err(|e| InputError::PositionUnavailable(e.to_string()))
    }

    fn set_position(&mut self, x: i32, y: i32) -> InputResult<()> {
        self.enigo
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| InputError::MoveFailed(e.to_string()))
    }
}
