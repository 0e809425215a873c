//! 点击控制任务
//!
//! 界面命令和全局输入事件都经由 [`ControlHandle`] 排队，交给单个
//! [`ClickController`] 任务串行处理。会话和分发器只在这个任务中被修改，
//! 界面可见的结果通过 [`StateManager`] 发布为 [`ClickerEvent`]。

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::error::{SessionError, SessionResult};
use super::state_machine::ClickSession;
use super::worker::LoopExit;
use crate::hotkey::{DispatchAction, InputEvent, RECORDING_PROMPT, ToggleDispatcher};
use crate::input::ActuatorFactory;
use crate::state::{ClickerConfig, ClickerEvent, StateManager};
use crate::utils::error::AppError;

/// 界面命令
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    /// 设置点击频率（次/秒）
    SetRate(f64),
    /// 开关指针抖动
    SetJitterEnabled(bool),
    /// 开始点击
    RequestStart,
    /// 停止点击
    RequestStop,
    /// 切换运行状态
    RequestToggle,
    /// 录制新的切换键
    RequestRecordToggleKey,
}

#[derive(Debug)]
enum ControlMessage {
    Command(UiCommand),
    Input(InputEvent),
    Shutdown(oneshot::Sender<SessionResult<()>>),
}

/// 控制任务句柄
///
/// 可以在任意线程（包括输入钩子线程）中使用
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: mpsc::UnboundedSender<ControlMessage>,
}

impl ControlHandle {
    /// 发送界面命令
    pub fn send(&self, command: UiCommand) -> SessionResult<()> {
        self.tx
            .send(ControlMessage::Command(command))
            .map_err(|_| SessionError::ChannelClosed)
    }

    /// 转发全局输入事件
    pub fn input(&self, event: InputEvent) -> SessionResult<()> {
        self.tx
            .send(ControlMessage::Input(event))
            .map_err(|_| SessionError::ChannelClosed)
    }

    /// 关闭控制任务，运行中的点击会先被停止
    pub async fn shutdown(&self) -> SessionResult<()> {
        let (response_tx, response_rx) = oneshot::channel();

        self.tx
            .send(ControlMessage::Shutdown(response_tx))
            .map_err(|_| SessionError::ChannelClosed)?;

        response_rx.await.map_err(|_| SessionError::ChannelClosed)?
    }
}

/// 点击控制器
pub struct ClickController {
    session: ClickSession,
    dispatcher: ToggleDispatcher,
    state: Arc<StateManager>,
    rx: mpsc::UnboundedReceiver<ControlMessage>,
    exit_rx: mpsc::UnboundedReceiver<LoopExit>,
}

impl ClickController {
    /// 创建控制器及其句柄
    pub fn new(
        config: &ClickerConfig,
        factory: ActuatorFactory,
        state: Arc<StateManager>,
    ) -> (Self, ControlHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (session, exit_rx) = ClickSession::new(config, factory, Arc::clone(&state));

        let controller = Self {
            session,
            dispatcher: ToggleDispatcher::new(),
            state,
            rx,
            exit_rx,
        };

        (controller, ControlHandle { tx })
    }

    pub fn session(&self) -> &ClickSession {
        &self.session
    }

    pub fn dispatcher(&self) -> &ToggleDispatcher {
        &self.dispatcher
    }

    /// 在当前运行时上启动控制任务
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// 控制任务主循环
    ///
    /// 收到关闭请求或所有句柄都被丢弃后退出
    pub async fn run(mut self) {
        tracing::info!("Click controller started");

        loop {
            tokio::select! {
                message = self.rx.recv() => match message {
                    Some(ControlMessage::Shutdown(response)) => {
                        let result = self.session.shutdown().await;
                        let _ = response.send(result);
                        break;
                    }
                    Some(ControlMessage::Command(command)) => self.handle_command(command).await,
                    Some(ControlMessage::Input(event)) => self.handle_input(event).await,
                    None => {
                        if let Err(e) = self.session.shutdown().await {
                            tracing::warn!(error = %e, "Failed to stop clicking on shutdown");
                        }
                        break;
                    }
                },
                Some(exit) = self.exit_rx.recv() => {
                    if let Some(error) = self.session.handle_loop_exit(exit).await {
                        self.report(error.into());
                    }
                }
            }
        }

        tracing::info!("Click controller stopped");
    }

    async fn handle_command(&mut self, command: UiCommand) {
        tracing::debug!(?command, "Handling UI command");

        let result: Result<(), AppError> = match command {
            UiCommand::SetRate(cps) => self.session.set_rate(cps).map(|_| ()).map_err(Into::into),
            UiCommand::SetJitterEnabled(enabled) => {
                self.session.set_jitter_enabled(enabled);
                Ok(())
            }
            UiCommand::RequestStart => self.session.start().map_err(Into::into),
            UiCommand::RequestStop => self.session.stop().await.map_err(Into::into),
            UiCommand::RequestToggle => self.session.toggle().await.map(|_| ()).map_err(Into::into),
            UiCommand::RequestRecordToggleKey => {
                if self.dispatcher.request_recording() {
                    self.state.publish(ClickerEvent::RecordingStarted {
                        prompt: RECORDING_PROMPT.to_string(),
                    });
                }
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(e);
        }
    }

    async fn handle_input(&mut self, event: InputEvent) {
        match self.dispatcher.dispatch(&event, self.session.toggle_binding()) {
            DispatchAction::Ignore => {}
            DispatchAction::Toggle => {
                if let Err(e) = self.session.toggle().await {
                    self.report(e.into());
                }
            }
            DispatchAction::BindingCaptured(binding) => {
                self.state.publish(ClickerEvent::toggle_key_changed(&binding));
                self.session.set_toggle_binding(Some(binding));
            }
        }
    }

    fn report(&self, error: AppError) {
        tracing::warn!(code = ?error.code(), error = %error, "Reporting error to UI");
        self.state.publish(ClickerEvent::error(&error));
    }
}
