//! 点击节奏模块
//!
//! 把用户设定的每秒点击数转换为基础间隔，并在此基础上叠加多层随机扰动，
//! 生成接近真人的点击间隔序列
//!
//! # 模块结构
//!
//! - `interval` - 点击速率与基础间隔的换算
//! - `randomizer` - 随机化引擎（正弦漂移、偏斜、高斯抖动、长停顿、指针抖动）

mod interval;
mod randomizer;

pub use interval::{
    DEFAULT_RATE_CPS, IntervalError, IntervalResult, MAX_RATE_CPS, MIN_RATE_CPS, clamp_rate,
    set_rate, validate_rate,
};
pub use randomizer::{
    CYCLE_PERIOD_MAX_SECS, CYCLE_PERIOD_MIN_SECS, ClickPlan, DRIFT_AMPLITUDE, GAUSSIAN_SIGMA_RATIO,
    LONG_PAUSE_CAP_FACTOR, LONG_PAUSE_PROBABILITY, PointerOffset, RandomizationState,
    TimingRandomizer,
};
