//! 点击速率换算
//!
//! 将每秒点击数（CPS）换算为两次点击之间的基础间隔（秒）

use thiserror::Error;

/// 允许的最小点击速率
pub const MIN_RATE_CPS: f64 = 1.0;

/// 允许的最大点击速率
pub const MAX_RATE_CPS: f64 = 20.0;

/// 默认点击速率
pub const DEFAULT_RATE_CPS: f64 = 10.0;

/// 速率相关错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntervalError {
    /// 速率超出 [1, 20] 或不是有限数
    #[error("Invalid click rate {cps}: expected a value between 1 and 20")]
    InvalidRate { cps: f64 },
}

/// 速率模块的结果类型
pub type IntervalResult<T> = Result<T, IntervalError>;

/// 计算基础点击间隔
///
/// 调用方负责把 `cps` 限制在 [1, 20] 内，这里只做换算
///
/// # Panics
///
/// `cps` 不为正数时 panic（违反调用约定）
///
/// # Examples
///
/// ```
/// use humanclick_lib::timing::set_rate;
///
/// assert_eq!(set_rate(10.0), 0.1);
/// assert_eq!(set_rate(4.0), 0.25);
/// ```
pub fn set_rate(cps: f64) -> f64 {
    assert!(cps > 0.0, "click rate must be positive, got {cps}");
    1.0 / cps
}

/// 将滑块等来源的速率限制到合法范围
///
/// 非有限值回退为默认速率
pub fn clamp_rate(cps: f64) -> f64 {
    if !cps.is_finite() {
        return DEFAULT_RATE_CPS;
    }
    cps.clamp(MIN_RATE_CPS, MAX_RATE_CPS)
}

/// 在命令边界校验速率
///
/// # Errors
///
/// 速率不在 [1, 20] 内时返回 [`IntervalError::InvalidRate`]
pub fn validate_rate(cps: f64) -> IntervalResult<f64> {
    if cps.is_finite() && (MIN_RATE_CPS..=MAX_RATE_CPS).contains(&cps) {
        Ok(cps)
    } else {
        Err(IntervalError::InvalidRate { cps })
    }
}
