//! 点击会话状态机
//!
//! `Idle ⇄ Running` 两态。任意时刻至多一个点击循环存活：
//! 启动时若上一个循环仍在收尾（活跃计数大于 0）则拒绝启动。
//!
//! 运行状态本身保存在 [`StateManager`] 中，状态变更由它负责通知界面。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use super::error::{SessionError, SessionResult};
use super::worker::{ClickWorker, LoopExit, LoopSettings};
use crate::hotkey::KeyOrButtonId;
use crate::input::ActuatorFactory;
use crate::state::{ClickerConfig, RunState, StateManager};
use crate::timing::{IntervalResult, set_rate, validate_rate};

/// 点击会话
pub struct ClickSession {
    rate_cps: f64,
    jitter_enabled: Arc<AtomicBool>,
    toggle_binding: Option<KeyOrButtonId>,
    stop_timeout: Duration,
    max_consecutive_failures: u32,
    factory: ActuatorFactory,
    state: Arc<StateManager>,
    worker: Option<ClickWorker>,
    /// 已由 stop 回收、退出报告尚未处理的运行编号
    stopped_runs: Vec<u64>,
    next_run_id: u64,
    active_loops: Arc<AtomicUsize>,
    exit_tx: mpsc::UnboundedSender<LoopExit>,
}

impl ClickSession {
    /// 创建会话
    ///
    /// 返回的接收端收到每个点击循环的退出报告，需要交给
    /// [`handle_loop_exit`](Self::handle_loop_exit) 处理
    pub fn new(
        config: &ClickerConfig,
        factory: ActuatorFactory,
        state: Arc<StateManager>,
    ) -> (Self, mpsc::UnboundedReceiver<LoopExit>) {
        let (exit_tx, exit_rx) = mpsc::unbounded_channel();

        let session = Self {
            rate_cps: config.rate_cps,
            jitter_enabled: Arc::new(AtomicBool::new(config.jitter_enabled)),
            toggle_binding: config.toggle_binding.clone(),
            stop_timeout: config.stop_timeout(),
            max_consecutive_failures: config.max_consecutive_failures,
            factory,
            state,
            worker: None,
            stopped_runs: Vec::new(),
            next_run_id: 1,
            active_loops: Arc::new(AtomicUsize::new(0)),
            exit_tx,
        };

        (session, exit_rx)
    }

    pub fn run_state(&self) -> RunState {
        self.state.current()
    }

    pub fn is_running(&self) -> bool {
        self.run_state().is_running()
    }

    pub fn rate_cps(&self) -> f64 {
        self.rate_cps
    }

    /// 设置点击频率，返回新的基准间隔（秒）
    ///
    /// 运行中的循环保持启动时的频率，新频率在下次启动时生效
    ///
    /// # Errors
    ///
    /// - `IntervalError::InvalidRate` - 频率不在 [1, 20] 内
    pub fn set_rate(&mut self, cps: f64) -> IntervalResult<f64> {
        let cps = validate_rate(cps)?;
        self.rate_cps = cps;
        tracing::debug!(cps, running = self.is_running(), "Click rate updated");
        Ok(set_rate(cps))
    }

    pub fn jitter_enabled(&self) -> bool {
        self.jitter_enabled.load(Ordering::Relaxed)
    }

    /// 开关指针抖动，运行中的循环在下一次迭代生效
    pub fn set_jitter_enabled(&self, enabled: bool) {
        self.jitter_enabled.store(enabled, Ordering::Relaxed);
        tracing::debug!(enabled, "Pointer jitter updated");
    }

    pub fn toggle_binding(&self) -> Option<&KeyOrButtonId> {
        self.toggle_binding.as_ref()
    }

    pub fn set_toggle_binding(&mut self, binding: Option<KeyOrButtonId>) {
        match &binding {
            Some(b) => tracing::info!(binding = %b, "Toggle binding set"),
            None => tracing::info!("Toggle binding cleared"),
        }
        self.toggle_binding = binding;
    }

    /// 当前存活的点击循环数量
    pub fn active_loops(&self) -> usize {
        self.active_loops.load(Ordering::SeqCst)
    }

    /// 启动点击
    ///
    /// # Errors
    ///
    /// - `SessionError::AlreadyRunning` - 已经在运行
    /// - `SessionError::NoToggleKeySet` - 尚未设置切换键
    /// - `SessionError::LoopStillAlive` - 上一个循环尚未退出
    /// - `SessionError::InvalidRate` - 点击频率不在 [1, 20] 内
    /// - `SessionError::SpawnFailed` - 无法创建点击线程
    pub fn start(&mut self) -> SessionResult<()> {
        if self.is_running() {
            return Err(SessionError::AlreadyRunning);
        }

        if self.toggle_binding.is_none() {
            tracing::warn!("Start requested without a toggle key");
            return Err(SessionError::NoToggleKeySet);
        }

        let alive = self.active_loops();
        if alive > 0 {
            tracing::warn!(alive, "Previous click loop has not exited yet");
            return Err(SessionError::LoopStillAlive);
        }

        let cps = validate_rate(self.rate_cps).inspect_err(|e| {
            tracing::warn!(error = %e, "Refusing to start with invalid click rate");
        })?;

        let run_id = self.next_run_id;
        self.next_run_id += 1;

        let settings = LoopSettings {
            run_id,
            base_interval: set_rate(cps),
            jitter: Arc::clone(&self.jitter_enabled),
            max_consecutive_failures: self.max_consecutive_failures,
        };

        let worker = ClickWorker::spawn(
            settings,
            Arc::clone(&self.factory),
            self.exit_tx.clone(),
            Arc::clone(&self.active_loops),
        )?;
        self.worker = Some(worker);

        self.enter(RunState::Running);
        tracing::info!(run_id, cps = self.rate_cps, "Clicking started");
        Ok(())
    }

    /// 停止点击
    ///
    /// 无论循环是否按时退出，状态都会回到 `Idle`
    ///
    /// # Errors
    ///
    /// - `SessionError::NotRunning` - 未在运行
    /// - `SessionError::StopTimeout` - 循环未在限定时间内退出
    pub async fn stop(&mut self) -> SessionResult<()> {
        if !self.is_running() {
            return Err(SessionError::NotRunning);
        }

        let result = match self.worker.take() {
            Some(worker) => {
                let run_id = worker.run_id();
                let result = worker.join(self.stop_timeout).await;
                self.stopped_runs.push(run_id);
                tracing::info!(run_id, ok = result.is_ok(), "Clicking stopped");
                result
            }
            None => Ok(()),
        };

        self.enter(RunState::Idle);
        result
    }

    /// 切换运行状态，返回切换后的状态
    pub async fn toggle(&mut self) -> SessionResult<RunState> {
        if self.is_running() {
            self.stop().await?;
        } else {
            self.start()?;
        }
        Ok(self.run_state())
    }

    /// 处理点击循环的退出报告
    ///
    /// 当前运行的循环自行退出时视为隐式停止。已被 stop 回收的运行只在
    /// 带有错误时（循环在停止前已经失败）返回错误。返回值是需要报告给用户的错误
    pub async fn handle_loop_exit(&mut self, exit: LoopExit) -> Option<SessionError> {
        let current = self.worker.as_ref().map(ClickWorker::run_id);
        if current != Some(exit.run_id) {
            let before = self.stopped_runs.len();
            self.stopped_runs.retain(|id| *id != exit.run_id);
            let was_stopped = self.stopped_runs.len() != before;

            if was_stopped && exit.error.is_some() {
                tracing::warn!(
                    run_id = exit.run_id,
                    clicks = exit.clicks,
                    error = ?exit.error,
                    "Click loop failed before it was stopped"
                );
                return exit.error;
            }

            tracing::debug!(run_id = exit.run_id, clicks = exit.clicks, "Ignoring stale loop exit");
            return None;
        }

        tracing::warn!(
            run_id = exit.run_id,
            clicks = exit.clicks,
            error = ?exit.error,
            "Click loop exited on its own"
        );

        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.join(self.stop_timeout).await {
                tracing::warn!(error = %e, "Failed to join exited click loop");
            }
        }

        if self.is_running() {
            self.enter(RunState::Idle);
        }

        exit.error
    }

    /// 关闭会话，运行中则先停止
    pub async fn shutdown(&mut self) -> SessionResult<()> {
        if self.is_running() {
            self.stop().await
        } else {
            Ok(())
        }
    }

    fn enter(&self, state: RunState) {
        if self.state.current() == state {
            return;
        }
        if let Err(e) = self.state.transition(state) {
            tracing::error!(error = %e, "Run state transition rejected");
        }
    }
}
