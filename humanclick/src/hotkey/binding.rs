//! 切换键绑定与输入事件定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::HotkeyError;

/// 键盘按键或鼠标按钮的标识
///
/// 只用于与输入事件做相等比较。文本形式为 `key:<名称>` 或 `button:<名称>`
///
/// # Examples
///
/// ```
/// use humanclick_lib::hotkey::KeyOrButtonId;
///
/// let id: KeyOrButtonId = "button:Middle".parse().unwrap();
/// assert_eq!(id, KeyOrButtonId::button("Middle"));
/// assert_eq!(id.label(), "Mouse Middle");
/// assert_eq!(id.to_string(), "button:Middle");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum KeyOrButtonId {
    /// 键盘按键
    Key(String),
    /// 鼠标按钮
    Button(String),
}

impl KeyOrButtonId {
    /// 创建键盘按键标识
    pub fn key(name: impl Into<String>) -> Self {
        Self::Key(name.into())
    }

    /// 创建鼠标按钮标识
    pub fn button(name: impl Into<String>) -> Self {
        Self::Button(name.into())
    }

    /// 按键或按钮名称
    pub fn name(&self) -> &str {
        match self {
            Self::Key(name) | Self::Button(name) => name,
        }
    }

    /// 供界面显示的标签
    pub fn label(&self) -> String {
        match self {
            Self::Key(name) => format!("Key {}", name),
            Self::Button(name) => format!("Mouse {}", name),
        }
    }
}

impl fmt::Display for KeyOrButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(name) => write!(f, "key:{}", name),
            Self::Button(name) => write!(f, "button:{}", name),
        }
    }
}

impl FromStr for KeyOrButtonId {
    type Err = HotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s
            .split_once(':')
            .ok_or_else(|| HotkeyError::InvalidFormat(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(HotkeyError::InvalidFormat(s.to_string()));
        }

        match kind.trim().to_ascii_lowercase().as_str() {
            "key" => Ok(Self::key(name)),
            "button" | "mouse" => Ok(Self::button(name)),
            _ => Err(HotkeyError::InvalidFormat(s.to_string())),
        }
    }
}

impl TryFrom<String> for KeyOrButtonId {
    type Error = HotkeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyOrButtonId> for String {
    fn from(id: KeyOrButtonId) -> Self {
        id.to_string()
    }
}

/// 输入事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEventKind {
    KeyPress,
    KeyRelease,
    MouseButtonPress,
    MouseButtonRelease,
}

impl InputEventKind {
    /// 是否为按下事件
    pub fn is_press(&self) -> bool {
        matches!(self, Self::KeyPress | Self::MouseButtonPress)
    }
}

/// 来自输入捕获层的离散事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: InputEventKind,
    pub id: KeyOrButtonId,
}

impl InputEvent {
    /// 键盘按下
    pub fn key_press(name: impl Into<String>) -> Self {
        Self {
            kind: InputEventKind::KeyPress,
            id: KeyOrButtonId::key(name),
        }
    }

    /// 键盘松开
    pub fn key_release(name: impl Into<String>) -> Self {
        Self {
            kind: InputEventKind::KeyRelease,
            id: KeyOrButtonId::key(name),
        }
    }

    /// 鼠标按钮按下
    pub fn button_press(name: impl Into<String>) -> Self {
        Self {
            kind: InputEventKind::MouseButtonPress,
            id: KeyOrButtonId::button(name),
        }
    }

    /// 鼠标按钮松开
    pub fn button_release(name: impl Into<String>) -> Self {
        Self {
            kind: InputEventKind::MouseButtonRelease,
            id: KeyOrButtonId::button(name),
        }
    }

    /// 是否为按下事件
    pub fn is_press(&self) -> bool {
        self.kind.is_press()
    }
}
