//! 点击间隔统计
//!
//! 对一串点击间隔（秒）计算描述性统计量，用于检查随机化引擎的输出是否
//! 接近真人点击的分布特征

use serde::Serialize;

/// 百分位表使用的分位点
pub const PERCENTILES: [f64; 9] = [1.0, 5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0];

/// 单个分位点的取值
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentileValue {
    pub percentile: f64,
    pub value: f64,
}

/// 间隔统计结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalStats {
    /// 间隔个数
    pub count: usize,
    /// 按总时长折算的每秒点击数
    pub cps: f64,
    pub mean: f64,
    pub median: f64,
    /// 总体标准差
    pub std_dev: f64,
    /// 总体方差
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub p25: f64,
    pub p75: f64,
    /// 四分位距
    pub iqr: f64,
    /// 偏度（有偏估计）
    pub skewness: f64,
    /// 超额峰度（Fisher 定义，有偏估计）
    pub kurtosis: f64,
    /// 变异系数 std / mean
    pub coefficient_of_variation: f64,
    /// 百分位表
    pub percentiles: Vec<PercentileValue>,
}

impl IntervalStats {
    /// 计算统计量
    ///
    /// 少于两个间隔或包含非有限值时返回 `None`
    ///
    /// # Examples
    ///
    /// ```
    /// use humanclick_lib::stats::IntervalStats;
    ///
    /// let stats = IntervalStats::from_intervals(&[0.1, 0.2, 0.3]).unwrap();
    /// assert!((stats.mean - 0.2).abs() < 1e-12);
    /// assert!((stats.median - 0.2).abs() < 1e-12);
    /// ```
    pub fn from_intervals(intervals: &[f64]) -> Option<Self> {
        if intervals.len() < 2 || intervals.iter().any(|v| !v.is_finite()) {
            return None;
        }

        let mut sorted = intervals.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len() as f64;
        let total: f64 = sorted.iter().sum();
        let mean = total / n;

        let central_moment = |power: i32| sorted.iter().map(|v| (v - mean).powi(power)).sum::<f64>() / n;
        let variance = central_moment(2);
        let std_dev = variance.sqrt();

        let (skewness, kurtosis) = if variance > 0.0 {
            (
                central_moment(3) / variance.powf(1.5),
                central_moment(4) / (variance * variance) - 3.0,
            )
        } else {
            (0.0, 0.0)
        };

        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let p25 = percentile(&sorted, 25.0);
        let p75 = percentile(&sorted, 75.0);

        Some(Self {
            count: sorted.len(),
            cps: if total > 0.0 { n / total } else { 0.0 },
            mean,
            median: percentile(&sorted, 50.0),
            std_dev,
            variance,
            min,
            max,
            range: max - min,
            p25,
            p75,
            iqr: p75 - p25,
            skewness,
            kurtosis,
            coefficient_of_variation: if mean != 0.0 { std_dev / mean } else { 0.0 },
            percentiles: PERCENTILES
                .iter()
                .map(|&p| PercentileValue {
                    percentile: p,
                    value: percentile(&sorted, p),
                })
                .collect(),
        })
    }
}

/// 线性插值分位数，`sorted` 必须已升序排列且非空
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
