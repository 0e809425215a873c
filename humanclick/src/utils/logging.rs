use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// 默认日志过滤规则
pub const DEFAULT_FILTER: &str = "humanclick=debug,humanclick_lib=debug,warn";

/// 初始化日志
///
/// - 优先读取 `RUST_LOG` 环境变量
/// - 未设置时使用 [`DEFAULT_FILTER`]
/// - 重复调用不会 panic，后续调用直接忽略
///
/// ```no_run
/// use humanclick_lib::utils::logging::init_logging;
///
/// init_logging();
/// ```
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let initialized = tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok();

    if initialized {
        tracing::info!("HumanClick logging initialized");
    }
}
