//! 点击器配置模块
//!
//! 启动时从只读的 JSON 文件加载配置（可选），命令行参数可覆盖其中的字段。
//! 运行期间的设置变化不会写回磁盘
//!
//! # 配置示例
//!
//! ```json
//! {
//!   "rate_cps": 12.0,
//!   "jitter_enabled": true,
//!   "toggle_binding": "key:F6"
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hotkey::KeyOrButtonId;
use crate::timing::{DEFAULT_RATE_CPS, IntervalError, validate_rate};

/// 默认停止等待时间（毫秒）
pub const DEFAULT_STOP_TIMEOUT_MS: u64 = 1000;

/// 默认允许的连续执行失败次数
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化/反序列化错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// 速率无效
    #[error(transparent)]
    Rate(#[from] IntervalError),

    /// 其他字段无效
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 配置结果类型
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 点击器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickerConfig {
    /// 每秒点击数（1 - 20）
    pub rate_cps: f64,
    /// 是否启用指针抖动
    pub jitter_enabled: bool,
    /// 切换键（None 表示尚未设置）
    pub toggle_binding: Option<KeyOrButtonId>,
    /// 停止时等待点击循环退出的最长时间（毫秒）
    pub stop_timeout_ms: u64,
    /// 连续执行失败多少次后终止点击循环
    pub max_consecutive_failures: u32,
}

impl Default for ClickerConfig {
    fn default() -> Self {
        Self {
            rate_cps: DEFAULT_RATE_CPS,
            jitter_enabled: false,
            toggle_binding: Some(KeyOrButtonId::button("Middle")),
            stop_timeout_ms: DEFAULT_STOP_TIMEOUT_MS,
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}

impl ClickerConfig {
    /// 从 JSON 文件加载配置
    ///
    /// 缺失的字段使用默认值，加载后会做校验
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading config");

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;

        tracing::info!(path = %path.display(), "Config loaded successfully");
        Ok(config)
    }

    /// 从 JSON 字符串解析配置
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    ///
    /// # Errors
    ///
    /// - `ConfigError::Rate` - 速率不在 [1, 20] 内
    /// - `ConfigError::Invalid` - 停止等待时间为 0
    pub fn validate(&self) -> ConfigResult<()> {
        validate_rate(self.rate_cps)?;

        if self.stop_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "stop_timeout_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 停止等待时间
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    /// 设置速率
    pub fn with_rate(mut self, rate_cps: f64) -> Self {
        self.rate_cps = rate_cps;
        self
    }

    /// 设置指针抖动
    pub fn with_jitter(mut self, enabled: bool) -> Self {
        self.jitter_enabled = enabled;
        self
    }

    /// 设置切换键
    pub fn with_toggle_binding(mut self, binding: Option<KeyOrButtonId>) -> Self {
        self.toggle_binding = binding;
        self
    }
}
