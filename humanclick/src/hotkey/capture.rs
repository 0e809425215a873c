//! 全局输入捕获
//!
//! 使用 rdev 监听系统级键盘和鼠标事件，并转换为 [`InputEvent`]
//!
//! `rdev::listen` 会阻塞调用线程且无法从外部停止，因此运行在独立的
//! 后台线程中，进程退出时随之结束

use std::thread::{self, JoinHandle};

use rdev::{Event, EventType};

use super::binding::InputEvent;
use super::error::{HotkeyError, HotkeyResult};

/// 将 rdev 事件转换为输入事件
///
/// 鼠标移动和滚轮事件返回 `None`
pub fn translate_event(event: &Event) -> Option<InputEvent> {
    match event.event_type {
        EventType::KeyPress(key) => Some(InputEvent::key_press(format!("{:?}", key))),
        EventType::KeyRelease(key) => Some(InputEvent::key_release(format!("{:?}", key))),
        EventType::ButtonPress(button) => Some(InputEvent::button_press(format!("{:?}", button))),
        EventType::ButtonRelease(button) => {
            Some(InputEvent::button_release(format!("{:?}", button)))
        }
        EventType::MouseMove { .. } | EventType::Wheel { .. } => None,
    }
}

/// 在后台线程启动全局输入捕获
///
/// 每个按键/按钮事件都会交给 `sink`
///
/// # Errors
///
/// 无法创建捕获线程时返回 [`HotkeyError::CaptureFailed`]
pub fn spawn_input_capture<F>(sink: F) -> HotkeyResult<JoinHandle<()>>
where
    F: Fn(InputEvent) + Send + 'static,
{
    let handle = thread::Builder::new()
        .name("input-capture".to_string())
        .spawn(move || {
            tracing::info!("Input capture started");

            let result = rdev::listen(move |event| {
                if let Some(input) = translate_event(&event) {
                    sink(input);
                }
            });

            if let Err(e) = result {
                tracing::error!(error = ?e, "Input capture stopped");
            }
        })
        .map_err(|e| HotkeyError::CaptureFailed(e.to_string()))?;

    Ok(handle)
}
