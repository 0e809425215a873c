use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::error::{StateError, StateResult};
use super::events::ClickerEvent;

/// 监听器通道容量
const LISTENER_CAPACITY: usize = 32;

/// 点击会话运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    /// 空闲，等待启动
    #[default]
    Idle,

    /// 后台点击循环运行中
    Running,
}

impl RunState {
    /// 检查是否为空闲状态
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// 检查是否在运行
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// 获取状态名称（用于日志和调试）
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Running => "Running",
        }
    }
}

/// 状态管理器
///
/// 保存当前运行状态并向订阅者广播界面可见的事件。
/// 写入只发生在控制任务上，读取可以在任何线程无锁进行
pub struct StateManager {
    /// 当前状态（使用 ArcSwap 实现无锁读取）
    state: ArcSwap<RunState>,

    /// 事件监听器列表
    listeners: Mutex<Vec<mpsc::Sender<ClickerEvent>>>,
}

impl StateManager {
    /// 创建新的状态管理器
    ///
    /// # Examples
    ///
    /// ```
    /// use humanclick_lib::state::StateManager;
    ///
    /// let manager = StateManager::new();
    /// assert!(manager.current().is_idle());
    /// ```
    pub fn new() -> Self {
        Self {
            state: ArcSwap::new(Arc::new(RunState::Idle)),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// 获取当前状态
    ///
    /// 此方法是无锁的，可以在任何线程安全地调用
    pub fn current(&self) -> RunState {
        **self.state.load()
    }

    /// 转换到新状态
    ///
    /// 只允许 Idle <-> Running，成功后广播 [`ClickerEvent::RunStateChanged`]
    ///
    /// # Errors
    ///
    /// 如果状态转换不合法，返回 [`StateError::InvalidTransition`]
    ///
    /// # Examples
    ///
    /// ```
    /// use humanclick_lib::state::{RunState, StateManager};
    ///
    /// let manager = StateManager::new();
    /// assert!(manager.transition(RunState::Running).is_ok());
    /// assert!(manager.transition(RunState::Running).is_err());
    /// ```
    pub fn transition(&self, new_state: RunState) -> StateResult<()> {
        let current = self.current();

        if !Self::is_valid_transition(current, new_state) {
            return Err(StateError::InvalidTransition {
                from: current,
                to: new_state,
            });
        }

        self.state.store(Arc::new(new_state));
        tracing::debug!(from = current.name(), to = new_state.name(), "Run state changed");

        self.publish(ClickerEvent::RunStateChanged(new_state));
        Ok(())
    }

    /// 添加事件监听器
    ///
    /// 返回的接收器将接收之后发布的所有事件
    pub fn subscribe(&self) -> mpsc::Receiver<ClickerEvent> {
        let (tx, rx) = mpsc::channel(LISTENER_CAPACITY);
        self.listeners.lock().push(tx);
        rx
    }

    /// 向所有监听者发布事件
    ///
    /// 使用 try_send 避免阻塞控制任务；已关闭的监听器会被移除
    pub fn publish(&self, event: ClickerEvent) {
        tracing::trace!(event = event.name(), "Publishing event");

        let mut listeners = self.listeners.lock();
        listeners.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(event = event.name(), "Listener queue is full, dropping event");
                true
            }
            Err(TrySendError::Closed(_)) => false,
        });
    }

    /// 移除所有已关闭的监听器
    pub fn cleanup_listeners(&self) {
        self.listeners.lock().retain(|tx| !tx.is_closed());
    }

    /// 获取当前监听器数量
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn is_valid_transition(from: RunState, to: RunState) -> bool {
        matches!(
            (from, to),
            (RunState::Idle, RunState::Running) | (RunState::Running, RunState::Idle)
        )
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}
