//! 点击间隔模型与随机化引擎的统计性质测试

use std::time::Duration;

use humanclick_lib::stats::IntervalStats;
use humanclick_lib::timing::{
    CYCLE_PERIOD_MAX_SECS, CYCLE_PERIOD_MIN_SECS, DRIFT_AMPLITUDE, GAUSSIAN_SIGMA_RATIO,
    IntervalError, LONG_PAUSE_CAP_FACTOR, MAX_RATE_CPS, MIN_RATE_CPS, TimingRandomizer,
    clamp_rate, set_rate, validate_rate,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const SKEW_MAX: f64 = 1.26;

#[test]
fn test_rate_to_interval() {
    assert!((set_rate(10.0) - 0.1).abs() < 1e-12);
    assert!((set_rate(1.0) - 1.0).abs() < 1e-12);
    assert!((set_rate(20.0) - 0.05).abs() < 1e-12);
}

#[test]
fn test_rate_boundaries() {
    assert_eq!(validate_rate(MIN_RATE_CPS), Ok(1.0));
    assert_eq!(validate_rate(MAX_RATE_CPS), Ok(20.0));
    assert_eq!(
        validate_rate(0.0),
        Err(IntervalError::InvalidRate { cps: 0.0 })
    );
    assert_eq!(clamp_rate(100.0), MAX_RATE_CPS);
    assert_eq!(clamp_rate(0.2), MIN_RATE_CPS);
}

#[test]
fn test_delays_stay_within_bounds() {
    let base = set_rate(10.0);
    let mut randomizer = TimingRandomizer::with_rng(base, StdRng::seed_from_u64(42));

    let upper_mean = base * (1.0 + DRIFT_AMPLITUDE) * SKEW_MAX;
    let delay_bound = upper_mean * (1.0 + 6.0 * GAUSSIAN_SIGMA_RATIO);
    let pause_bound = LONG_PAUSE_CAP_FACTOR * base;

    let mut elapsed = Duration::ZERO;
    let mut delays = Vec::with_capacity(10_000);

    for _ in 0..10_000 {
        let plan = randomizer.next_click(elapsed);

        assert!(plan.delay.as_secs_f64() <= delay_bound);
        if let Some(pause) = plan.long_pause {
            assert!(pause.as_secs_f64() <= pause_bound + 1e-9);
        }

        elapsed += plan.total();
        delays.push(plan.delay.as_secs_f64());
    }

    let stats = IntervalStats::from_intervals(&delays).unwrap();
    // 偏移均值约为 1.052 * base
    assert!(stats.mean > base * 0.9 && stats.mean < base * 1.25);
    assert!(stats.std_dev > 0.0);
}

#[test]
fn test_total_interval_bounded_by_pause_cap_and_delay() {
    for cps in [MIN_RATE_CPS, 10.0, MAX_RATE_CPS] {
        let base = set_rate(cps);
        let mut randomizer = TimingRandomizer::with_rng(base, StdRng::seed_from_u64(7));

        let upper_mean = base * (1.0 + DRIFT_AMPLITUDE) * SKEW_MAX;
        let total_bound =
            LONG_PAUSE_CAP_FACTOR * base + upper_mean * (1.0 + 4.0 * GAUSSIAN_SIGMA_RATIO);

        let mut elapsed = Duration::ZERO;
        for _ in 0..10_000 {
            let plan = randomizer.next_click(elapsed);
            let total = plan.total().as_secs_f64();
            assert!(
                total <= total_bound,
                "cps {}: interval {} exceeds {}",
                cps,
                total,
                total_bound
            );
            elapsed += plan.total();
        }
    }
}

#[test]
fn test_simulated_rate_near_target() {
    let base = set_rate(10.0);
    let intervals =
        TimingRandomizer::with_rng(base, StdRng::seed_from_u64(3)).simulate(10_000);
    let stats = IntervalStats::from_intervals(&intervals).unwrap();

    // 偏移和长停顿使实际频率略低于目标
    assert!(stats.cps > 7.0 && stats.cps <= 10.0);
    assert_eq!(stats.count, 10_000);
}

#[test]
fn test_cycle_period_stays_in_range() {
    let mut randomizer = TimingRandomizer::with_rng(0.05, StdRng::seed_from_u64(11));
    let mut elapsed = Duration::ZERO;

    for _ in 0..5_000 {
        let plan = randomizer.next_click(elapsed);
        elapsed += plan.total();

        let period = randomizer.state().cycle_period;
        assert!((CYCLE_PERIOD_MIN_SECS..=CYCLE_PERIOD_MAX_SECS).contains(&period));
        assert!(randomizer.state().cycle_start <= elapsed.as_secs_f64());
    }
}
