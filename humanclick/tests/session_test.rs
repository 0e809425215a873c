//! 点击会话集成测试
//!
//! 使用计数执行器代替 enigo，不会产生真实点击

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use humanclick_lib::input::{ActuatorFactory, ClickActuator, InputError, InputResult, MouseButton};
use humanclick_lib::session::{ClickSession, SessionError};
use humanclick_lib::state::{ClickerConfig, RunState, StateManager};
use tokio::time::{Duration, sleep, timeout};

struct MockActuator {
    clicks: Arc<AtomicU64>,
    fail: bool,
}

impl ClickActuator for MockActuator {
    fn click(&mut self, _button: MouseButton, count: u32) -> InputResult<()> {
        if self.fail {
            return Err(InputError::ClickFailed("mock failure".to_string()));
        }
        self.clicks.fetch_add(count as u64, Ordering::SeqCst);
        Ok(())
    }

    fn position(&self) -> InputResult<(i32, i32)> {
        Ok((500, 500))
    }

    fn set_position(&mut self, _x: i32, _y: i32) -> InputResult<()> {
        Ok(())
    }
}

fn mock_factory(clicks: Arc<AtomicU64>, fail: bool) -> ActuatorFactory {
    Arc::new(move || {
        Ok(Box::new(MockActuator {
            clicks: Arc::clone(&clicks),
            fail,
        }) as Box<dyn ClickActuator>)
    })
}

#[tokio::test]
async fn test_clicks_while_running_and_not_after_stop() {
    let clicks = Arc::new(AtomicU64::new(0));
    let config = ClickerConfig::default().with_rate(20.0);
    let (mut session, _exit_rx) = ClickSession::new(
        &config,
        mock_factory(Arc::clone(&clicks), false),
        Arc::new(StateManager::new()),
    );

    session.start().unwrap();
    sleep(Duration::from_millis(500)).await;
    session.stop().await.unwrap();

    let after_stop = clicks.load(Ordering::SeqCst);
    assert!(after_stop > 0);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(clicks.load(Ordering::SeqCst), after_stop);
    assert_eq!(session.active_loops(), 0);
}

#[tokio::test]
async fn test_stop_is_bounded_at_lowest_rate() {
    let clicks = Arc::new(AtomicU64::new(0));
    let config = ClickerConfig::default().with_rate(1.0);
    let (mut session, _exit_rx) = ClickSession::new(
        &config,
        mock_factory(clicks, false),
        Arc::new(StateManager::new()),
    );

    session.start().unwrap();
    sleep(Duration::from_millis(300)).await;

    let started = Instant::now();
    session.stop().await.unwrap();
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(session.run_state(), RunState::Idle);
}

#[tokio::test]
async fn test_at_most_one_loop_across_rapid_toggles() {
    let clicks = Arc::new(AtomicU64::new(0));
    let (mut session, _exit_rx) = ClickSession::new(
        &ClickerConfig::default(),
        mock_factory(clicks, false),
        Arc::new(StateManager::new()),
    );

    for _ in 0..20 {
        session.toggle().await.unwrap();
        assert!(session.active_loops() <= 1);
    }

    assert_eq!(session.run_state(), RunState::Idle);
    assert_eq!(session.active_loops(), 0);
}

#[tokio::test]
async fn test_start_without_binding_is_refused() {
    let clicks = Arc::new(AtomicU64::new(0));
    let config = ClickerConfig::default().with_toggle_binding(None);
    let (mut session, _exit_rx) = ClickSession::new(
        &config,
        mock_factory(Arc::clone(&clicks), false),
        Arc::new(StateManager::new()),
    );

    assert_eq!(session.toggle().await, Err(SessionError::NoToggleKeySet));
    assert_eq!(session.run_state(), RunState::Idle);
    assert_eq!(clicks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_actuator_failure_returns_to_idle() {
    let clicks = Arc::new(AtomicU64::new(0));
    let config = ClickerConfig::default().with_rate(20.0);
    let (mut session, mut exit_rx) = ClickSession::new(
        &config,
        mock_factory(clicks, true),
        Arc::new(StateManager::new()),
    );

    session.start().unwrap();

    let exit = timeout(Duration::from_secs(2), exit_rx.recv())
        .await
        .unwrap()
        .unwrap();
    let error = session.handle_loop_exit(exit).await;

    assert!(matches!(error, Some(SessionError::ActuatorFailure(_))));
    assert_eq!(session.run_state(), RunState::Idle);
    assert_eq!(session.active_loops(), 0);

    // 可以再次启动
    session.start().unwrap();
    assert!(session.is_running());
}

#[tokio::test]
async fn test_failure_reported_when_stop_races_loop_exit() {
    let clicks = Arc::new(AtomicU64::new(0));
    let config = ClickerConfig::default().with_rate(20.0);
    let (mut session, mut exit_rx) = ClickSession::new(
        &config,
        mock_factory(clicks, true),
        Arc::new(StateManager::new()),
    );

    session.start().unwrap();

    // 循环已经因失败退出，但退出报告尚未处理时收到停止请求
    let exit = timeout(Duration::from_secs(2), exit_rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(exit.error, Some(SessionError::ActuatorFailure(_))));

    session.stop().await.unwrap();
    assert_eq!(session.run_state(), RunState::Idle);

    let error = session.handle_loop_exit(exit).await;
    assert_eq!(
        error,
        Some(SessionError::ActuatorFailure(InputError::ClickFailed(
            "mock failure".to_string()
        )))
    );
}

#[tokio::test]
async fn test_invalid_rate_in_config_does_not_panic() {
    let clicks = Arc::new(AtomicU64::new(0));
    let config = ClickerConfig::default().with_rate(0.0);
    let (mut session, _exit_rx) = ClickSession::new(
        &config,
        mock_factory(Arc::clone(&clicks), false),
        Arc::new(StateManager::new()),
    );

    assert!(matches!(
        session.toggle().await,
        Err(SessionError::InvalidRate(_))
    ));
    assert_eq!(session.run_state(), RunState::Idle);
    assert_eq!(session.active_loops(), 0);
    assert_eq!(clicks.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rate_change_applies_on_next_start() {
    let clicks = Arc::new(AtomicU64::new(0));
    let (mut session, _exit_rx) = ClickSession::new(
        &ClickerConfig::default(),
        mock_factory(clicks, false),
        Arc::new(StateManager::new()),
    );

    session.start().unwrap();
    assert!(session.set_rate(5.0).is_ok());
    assert_eq!(session.rate_cps(), 5.0);
    assert!(session.set_rate(21.0).is_err());
    session.stop().await.unwrap();
}
