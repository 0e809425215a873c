//! 点击循环
//!
//! 点击循环运行在专用线程上，线程内部使用 current_thread 运行时。
//! 执行器在线程内部由工厂创建，因此执行器不需要 `Send`。
//!
//! 所有等待都与停止信号竞争，收到停止信号后立即返回，不会再执行点击。
//! 线程退出时（包括 panic）通过 [`LoopExit`] 报告结果，并递减活跃循环计数。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};

use super::error::{SessionError, SessionResult};
use crate::input::{ActuatorFactory, ClickActuator, MouseButton};
use crate::timing::TimingRandomizer;

/// 点击循环参数
///
/// 在启动时确定，运行期间只有 `jitter` 可以被修改
#[derive(Debug, Clone)]
pub(crate) struct LoopSettings {
    pub run_id: u64,
    pub base_interval: f64,
    pub jitter: Arc<AtomicBool>,
    pub max_consecutive_failures: u32,
}

/// 点击循环退出报告
#[derive(Debug, Clone, PartialEq)]
pub struct LoopExit {
    /// 运行编号
    pub run_id: u64,
    /// 成功的点击次数
    pub clicks: u64,
    /// 非正常退出的原因，正常停止时为 `None`
    pub error: Option<SessionError>,
}

type LoopOutcome = (u64, Option<SessionError>);

/// 后台点击线程句柄
pub(crate) struct ClickWorker {
    run_id: u64,
    stop_tx: watch::Sender<bool>,
    thread: thread::JoinHandle<()>,
}

impl ClickWorker {
    /// 启动点击线程
    ///
    /// `active_loops` 在线程创建前递增，由线程退出守卫递减
    pub(crate) fn spawn(
        settings: LoopSettings,
        factory: ActuatorFactory,
        exit_tx: mpsc::UnboundedSender<LoopExit>,
        active_loops: Arc<AtomicUsize>,
    ) -> SessionResult<Self> {
        let run_id = settings.run_id;
        let (stop_tx, stop_rx) = watch::channel(false);

        active_loops.fetch_add(1, Ordering::SeqCst);
        let guard_counter = Arc::clone(&active_loops);

        let spawned = thread::Builder::new()
            .name(format!("click-loop-{run_id}"))
            .spawn(move || {
                let mut guard = ExitGuard {
                    run_id,
                    exit_tx,
                    active_loops: guard_counter,
                    outcome: None,
                };
                guard.outcome = Some(run_loop_thread(settings, factory, stop_rx));
            });

        match spawned {
            Ok(thread) => Ok(Self {
                run_id,
                stop_tx,
                thread,
            }),
            Err(e) => {
                active_loops.fetch_sub(1, Ordering::SeqCst);
                tracing::error!(run_id, error = %e, "Failed to spawn click loop thread");
                Err(SessionError::SpawnFailed(e.to_string()))
            }
        }
    }

    pub(crate) fn run_id(&self) -> u64 {
        self.run_id
    }

    /// 发送停止信号并等待线程退出
    ///
    /// # Errors
    ///
    /// - `SessionError::StopTimeout` - 线程未在 `timeout` 内退出，线程继续在后台收尾
    /// - `SessionError::LoopCrashed` - 等待任务本身失败
    pub(crate) async fn join(self, timeout: Duration) -> SessionResult<()> {
        let Self {
            run_id,
            stop_tx,
            thread,
        } = self;

        // 循环可能已经退出，此时没有接收者
        let _ = stop_tx.send(true);

        let joined = tokio::time::timeout(
            timeout,
            tokio::task::spawn_blocking(move || thread.join()),
        )
        .await;

        match joined {
            Ok(Ok(Ok(()))) => {
                tracing::debug!(run_id, "Click loop joined");
                Ok(())
            }
            Ok(Ok(Err(_))) => {
                // 退出守卫已经报告过 panic
                tracing::warn!(run_id, "Click loop thread panicked");
                Ok(())
            }
            Ok(Err(e)) => Err(SessionError::LoopCrashed(e.to_string())),
            Err(_) => {
                let ms = timeout.as_millis() as u64;
                tracing::error!(run_id, timeout_ms = ms, "Click loop did not stop in time");
                Err(SessionError::StopTimeout(ms))
            }
        }
    }
}

/// 线程退出守卫
///
/// 在 drop 时递减活跃计数并发送退出报告，线程 panic 时同样生效
struct ExitGuard {
    run_id: u64,
    exit_tx: mpsc::UnboundedSender<LoopExit>,
    active_loops: Arc<AtomicUsize>,
    outcome: Option<LoopOutcome>,
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        let (clicks, error) = self.outcome.take().unwrap_or_else(|| {
            (
                0,
                Some(SessionError::LoopCrashed("click loop panicked".to_string())),
            )
        });

        // 先递减计数，控制任务收到报告时计数已经归零
        self.active_loops.fetch_sub(1, Ordering::SeqCst);

        let _ = self.exit_tx.send(LoopExit {
            run_id: self.run_id,
            clicks,
            error,
        });
    }
}

fn run_loop_thread(
    settings: LoopSettings,
    factory: ActuatorFactory,
    stop_rx: watch::Receiver<bool>,
) -> LoopOutcome {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            return (
                0,
                Some(SessionError::LoopCrashed(format!(
                    "failed to create click loop runtime: {e}"
                ))),
            );
        }
    };

    let actuator = match factory() {
        Ok(actuator) => actuator,
        Err(e) => {
            tracing::error!(run_id = settings.run_id, error = %e, "Failed to create click actuator");
            return (0, Some(SessionError::ActuatorFailure(e)));
        }
    };

    runtime.block_on(click_loop(settings, actuator, stop_rx))
}

/// 点击循环主体
///
/// 1. 启动延迟 U(base/8, base/6)
/// 2. 每次迭代：可选长停顿 → 点击 → 主延迟 → 可选指针抖动
async fn click_loop(
    settings: LoopSettings,
    mut actuator: Box<dyn ClickActuator>,
    mut stop_rx: watch::Receiver<bool>,
) -> LoopOutcome {
    let LoopSettings {
        run_id,
        base_interval,
        jitter,
        max_consecutive_failures,
    } = settings;
    let max_failures = max_consecutive_failures.max(1);

    let mut randomizer = TimingRandomizer::new(base_interval);
    let mut clicks: u64 = 0;
    let mut failures: u32 = 0;

    tracing::info!(run_id, base_interval, "Click loop started");

    if !sleep_unless_stopped(randomizer.start_delay(), &mut stop_rx).await {
        tracing::info!(run_id, clicks, "Click loop stopped before first click");
        return (clicks, None);
    }

    let started = Instant::now();

    loop {
        if *stop_rx.borrow() {
            break;
        }

        let plan = randomizer.next_click(started.elapsed());

        if let Some(pause) = plan.long_pause {
            tracing::trace!(run_id, pause_ms = pause.as_millis() as u64, "Long pause");
            if !sleep_unless_stopped(pause, &mut stop_rx).await {
                break;
            }
        }

        match actuator.click(MouseButton::Left, 1) {
            Ok(()) => {
                clicks += 1;
                failures = 0;
            }
            Err(e) => {
                failures += 1;
                tracing::warn!(run_id, error = %e, failures, "Click failed");
                if failures >= max_failures {
                    tracing::error!(run_id, clicks, "Too many consecutive click failures, aborting");
                    return (clicks, Some(SessionError::ActuatorFailure(e)));
                }
            }
        }

        if !sleep_unless_stopped(plan.delay, &mut stop_rx).await {
            break;
        }

        if jitter.load(Ordering::Relaxed) {
            let offset = randomizer.pointer_jitter();
            if let Err(e) = actuator.move_by(offset) {
                tracing::warn!(run_id, error = %e, "Pointer jitter failed");
            }
        }
    }

    tracing::info!(run_id, clicks, "Click loop stopped");
    (clicks, None)
}

/// 等待 `duration`，期间收到停止信号则立即返回
///
/// 返回 `true` 表示循环可以继续
async fn sleep_unless_stopped(duration: Duration, stop_rx: &mut watch::Receiver<bool>) -> bool {
    if *stop_rx.borrow() {
        return false;
    }

    let stopped = tokio::select! {
        _ = tokio::time::sleep(duration) => false,
        // 发送端被丢弃同样视为停止
        _ = stop_rx.wait_for(|stopped| *stopped) => true,
    };

    !stopped && !*stop_rx.borrow()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputError, InputResult};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Counters {
        clicks: u64,
        moves: u64,
    }

    struct CountingActuator {
        counters: Arc<Mutex<Counters>>,
        fail: bool,
    }

    impl ClickActuator for CountingActuator {
        fn click(&mut self, _button: MouseButton, count: u32) -> InputResult<()> {
            if self.fail {
                return Err(InputError::ClickFailed("mock".to_string()));
            }
            self.counters.lock().clicks += count as u64;
            Ok(())
        }

        fn position(&self) -> InputResult<(i32, i32)> {
            Ok((100, 100))
        }

        fn set_position(&mut self, _x: i32, _y: i32) -> InputResult<()> {
            self.counters.lock().moves += 1;
            Ok(())
        }
    }

    fn settings(cps: f64, jitter: bool, max_failures: u32) -> LoopSettings {
        LoopSettings {
            run_id: 1,
            base_interval: 1.0 / cps,
            jitter: Arc::new(AtomicBool::new(jitter)),
            max_consecutive_failures: max_failures,
        }
    }

    #[tokio::test]
    async fn test_sleep_returns_early_on_stop() {
        let (tx, mut rx) = watch::channel(false);
        let started = Instant::now();

        let handle = tokio::spawn(async move {
            sleep_unless_stopped(Duration::from_secs(10), &mut rx).await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        tx.send(true).unwrap();

        let should_continue = handle.await.unwrap();
        assert!(!should_continue);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_sleep_completes_without_stop() {
        let (_tx, mut rx) = watch::channel(false);
        assert!(sleep_unless_stopped(Duration::from_millis(5), &mut rx).await);
    }

    #[tokio::test]
    async fn test_sleep_stops_when_sender_dropped() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        assert!(!sleep_unless_stopped(Duration::from_secs(10), &mut rx).await);
    }

    #[tokio::test]
    async fn test_click_loop_clicks_and_jitters() {
        let counters = Arc::new(Mutex::new(Counters::default()));
        let actuator = Box::new(CountingActuator {
            counters: Arc::clone(&counters),
            fail: false,
        });
        let (tx, rx) = watch::channel(false);

        let stopper = async move {
            tokio::time::sleep(Duration::from_millis(400)).await;
            tx.send(true).unwrap();
        };
        let ((clicks, error), ()) =
            tokio::join!(click_loop(settings(20.0, true, 5), actuator, rx), stopper);
        assert!(error.is_none());
        assert!(clicks > 0);
        assert_eq!(counters.lock().clicks, clicks);
        assert!(counters.lock().moves > 0);
    }

    #[tokio::test]
    async fn test_click_loop_aborts_after_consecutive_failures() {
        let counters = Arc::new(Mutex::new(Counters::default()));
        let actuator = Box::new(CountingActuator {
            counters,
            fail: true,
        });
        let (_tx, rx) = watch::channel(false);

        let (clicks, error) = click_loop(settings(20.0, false, 3), actuator, rx).await;
        assert_eq!(clicks, 0);
        assert!(matches!(error, Some(SessionError::ActuatorFailure(_))));
    }

    #[tokio::test]
    async fn test_worker_reports_exit_and_releases_counter() {
        let counters = Arc::new(Mutex::new(Counters::default()));
        let factory_counters = Arc::clone(&counters);
        let factory: ActuatorFactory = Arc::new(move || {
            Ok(Box::new(CountingActuator {
                counters: Arc::clone(&factory_counters),
                fail: false,
            }) as Box<dyn ClickActuator>)
        });
        let (exit_tx, mut exit_rx) = mpsc::unbounded_channel();
        let active = Arc::new(AtomicUsize::new(0));

        let worker =
            ClickWorker::spawn(settings(10.0, false, 5), factory, exit_tx, Arc::clone(&active))
                .unwrap();
        assert_eq!(active.load(Ordering::SeqCst), 1);
        assert_eq!(worker.run_id(), 1);

        worker.join(Duration::from_secs(1)).await.unwrap();
        assert_eq!(active.load(Ordering::SeqCst), 0);

        let exit = exit_rx.recv().await.unwrap();
        assert_eq!(exit.run_id, 1);
        assert!(exit.error.is_none());
    }

    #[tokio::test]
    async fn test_worker_reports_factory_failure() {
        let factory: ActuatorFactory = Arc::new(|| -> InputResult<Box<dyn ClickActuator>> {
            Err(InputError::InitFailed("no display".to_string()))
        });
        let (exit_tx, mut exit_rx) = mpsc::unbounded_channel();
        let active = Arc::new(AtomicUsize::new(0));

        let _worker =
            ClickWorker::spawn(settings(10.0, false, 5), factory, exit_tx, Arc::clone(&active))
                .unwrap();

        let exit = exit_rx.recv().await.unwrap();
        assert_eq!(
            exit.error,
            Some(SessionError::ActuatorFailure(InputError::InitFailed(
                "no display".to_string()
            )))
        );
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }
}
