//! 点击间隔随机化引擎
//!
//! 每次点击的等待时间由以下几层叠加而成：
//!
//! 1. **正弦漂移** - 基础间隔随一个 2.76 ~ 5.4 秒的周期缓慢上下浮动 ±11.3%
//! 2. **单次偏斜** - 乘以 U(0.844, 1.26) 的偏斜系数
//! 3. **高斯抖动** - 以偏斜后的间隔为均值、12% 为标准差采样
//! 4. **长停顿** - 5% 概率在点击前插入指数分布的额外停顿，上限为 3.06 倍基础间隔
//! 5. **指针抖动** - 点击后可选的小幅相对移动
//!
//! 开始点击前还会有一次 U(base/8, base/6) 的启动延迟。
//!
//! # 使用示例
//!
//! ```
//! use std::time::Duration;
//! use humanclick_lib::timing::TimingRandomizer;
//!
//! let mut randomizer = TimingRandomizer::new(0.1);
//! let start = randomizer.start_delay();
//! assert!(start <= Duration::from_secs_f64(0.1 / 6.0));
//!
//! let plan = randomizer.next_click(Duration::from_millis(250));
//! assert!(plan.total() > Duration::ZERO);
//! ```

use std::f64::consts::TAU;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};

/// 漂移周期下限（秒）
pub const CYCLE_PERIOD_MIN_SECS: f64 = 2.76;

/// 漂移周期上限（秒）
pub const CYCLE_PERIOD_MAX_SECS: f64 = 5.4;

/// 正弦漂移幅度（相对基础间隔）
pub const DRIFT_AMPLITUDE: f64 = 0.113;

/// 高斯抖动标准差与均值之比
pub const GAUSSIAN_SIGMA_RATIO: f64 = 0.12;

/// 每次点击插入长停顿的概率
pub const LONG_PAUSE_PROBABILITY: f64 = 0.05;

/// 长停顿上限（基础间隔的倍数）
pub const LONG_PAUSE_CAP_FACTOR: f64 = 3.06;

const SKEW_MIN: f64 = 0.844;
const SKEW_MAX: f64 = 1.26;

const LONG_PAUSE_FACTOR_MIN: f64 = 1.235;
const LONG_PAUSE_FACTOR_MAX: f64 = 2.367;

const JITTER_STEP: i32 = 3;
const JITTER_SIGMA: f64 = 1.6;

/// 随机化状态
///
/// 每次开始运行时创建，停止时丢弃，从不持久化
#[derive(Debug, Clone, PartialEq)]
pub struct RandomizationState {
    /// 当前漂移周期的起点（相对运行开始的秒数）
    pub cycle_start: f64,
    /// 当前漂移周期长度（秒）
    pub cycle_period: f64,
    /// 基础间隔（秒）
    pub base_interval: f64,
}

/// 单次点击的计划
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickPlan {
    /// 点击前的额外长停顿
    pub long_pause: Option<Duration>,
    /// 点击后到下一次点击前的等待
    pub delay: Duration,
}

impl ClickPlan {
    /// 本次点击占用的总时长
    pub fn total(&self) -> Duration {
        self.long_pause.unwrap_or(Duration::ZERO) + self.delay
    }
}

/// 指针抖动偏移（像素）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerOffset {
    pub dx: f64,
    pub dy: f64,
}

impl PointerOffset {
    /// 以当前位置为起点计算移动后的位置
    pub fn apply(&self, (x, y): (i32, i32)) -> (i32, i32) {
        (
            (x as f64 + self.dx).round() as i32,
            (y as f64 + self.dy).round() as i32,
        )
    }
}

/// 点击间隔随机化器
///
/// 对随机数源泛型，生产环境使用熵初始化的 [`StdRng`]，测试可以传入固定种子
pub struct TimingRandomizer<R: Rng = StdRng> {
    state: RandomizationState,
    rng: R,
}

impl TimingRandomizer<StdRng> {
    /// 以基础间隔创建随机化器
    pub fn new(base_interval: f64) -> Self {
        Self::with_rng(base_interval, StdRng::from_entropy())
    }
}

impl<R: Rng> TimingRandomizer<R> {
    /// 使用指定随机数源创建随机化器
    ///
    /// 漂移周期在此时第一次抽取
    pub fn with_rng(base_interval: f64, mut rng: R) -> Self {
        debug_assert!(
            base_interval.is_finite() && base_interval > 0.0,
            "base interval must be positive"
        );

        let cycle_period = rng.gen_range(CYCLE_PERIOD_MIN_SECS..=CYCLE_PERIOD_MAX_SECS);

        Self {
            state: RandomizationState {
                cycle_start: 0.0,
                cycle_period,
                base_interval,
            },
            rng,
        }
    }

    /// 当前随机化状态
    pub fn state(&self) -> &RandomizationState {
        &self.state
    }

    /// 基础间隔（秒）
    pub fn base_interval(&self) -> f64 {
        self.state.base_interval
    }

    /// 启动延迟：U(base/8, base/6)
    pub fn start_delay(&mut self) -> Duration {
        let base = self.state.base_interval;
        Duration::from_secs_f64(self.rng.gen_range(base / 8.0..=base / 6.0))
    }

    /// 计算给定时刻经过正弦漂移后的间隔
    ///
    /// `elapsed_secs` 为相对运行开始的秒数
    pub fn drifted_interval(&self, elapsed_secs: f64) -> f64 {
        let since = (elapsed_secs - self.state.cycle_start).max(0.0);
        let period = self.state.cycle_period;
        let progress = (since % period) / period;

        self.state.base_interval * (1.0 + DRIFT_AMPLITUDE * (progress * TAU).sin())
    }

    /// 规划下一次点击
    ///
    /// `elapsed` 为运行开始至今的时长。当前周期走完时会重新抽取周期长度，
    /// 并把周期起点重置为 `elapsed`
    pub fn next_click(&mut self, elapsed: Duration) -> ClickPlan {
        let now = elapsed.as_secs_f64();
        let drifted = self.drifted_interval(now);

        let skew = self.rng.gen_range(SKEW_MIN..=SKEW_MAX);
        let mean = drifted * skew;

        // 负值不重抽，直接截断为 0
        let delay = match Normal::new(mean, mean * GAUSSIAN_SIGMA_RATIO) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => mean,
        }
        .max(0.0);

        let long_pause = if self.rng.gen_bool(LONG_PAUSE_PROBABILITY) {
            Some(Duration::from_secs_f64(self.draw_long_pause()))
        } else {
            None
        };

        if now - self.state.cycle_start >= self.state.cycle_period {
            self.state.cycle_start = now;
            self.state.cycle_period = self
                .rng
                .gen_range(CYCLE_PERIOD_MIN_SECS..=CYCLE_PERIOD_MAX_SECS);

            tracing::trace!(
                cycle_period = self.state.cycle_period,
                "Started new variation cycle"
            );
        }

        ClickPlan {
            long_pause,
            delay: Duration::from_secs_f64(delay),
        }
    }

    /// 以虚拟时钟连续规划 `count` 次点击，返回每次的总等待（秒）
    ///
    /// 不实际等待，虚拟时钟按每次规划的总时长推进
    pub fn simulate(&mut self, count: usize) -> Vec<f64> {
        let mut elapsed = Duration::ZERO;

        (0..count)
            .map(|_| {
                let total = self.next_click(elapsed).total();
                elapsed += total;
                total.as_secs_f64()
            })
            .collect()
    }

    /// 指针抖动：每个轴 UniformInt(-3, 3) + N(0, 1.6)，两轴共用同一个高斯样本
    pub fn pointer_jitter(&mut self) -> PointerOffset {
        let magnitude = match Normal::new(0.0, JITTER_SIGMA) {
            Ok(normal) => normal.sample(&mut self.rng),
            Err(_) => 0.0,
        };

        PointerOffset {
            dx: self.rng.gen_range(-JITTER_STEP..=JITTER_STEP) as f64 + magnitude,
            dy: self.rng.gen_range(-JITTER_STEP..=JITTER_STEP) as f64 + magnitude,
        }
    }

    /// 抽取长停顿时长（秒），均值为 base * U(1.235, 2.367)，上限 3.06 * base
    fn draw_long_pause(&mut self) -> f64 {
        let base = self.state.base_interval;
        let factor = self
            .rng
            .gen_range(LONG_PAUSE_FACTOR_MIN..=LONG_PAUSE_FACTOR_MAX);
        let cap = LONG_PAUSE_CAP_FACTOR * base;

        match Exp::new(1.0 / (base * factor)) {
            Ok(exp) => exp.sample(&mut self.rng).min(cap),
            Err(_) => cap,
        }
    }
}
