//! 合成时间序列生成器
//!
//! 生成带周期性（工作时间 / 非工作时间）、增长趋势、自相关噪声和
//! 随机假日的整数序列，用于填充演示用的计数表。相同参数和种子
//! 总是生成相同的序列。

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use super::counts::{CountStat, Frequency};
use crate::errors::{AnalyticsError, Result};

/// 默认随机种子
pub const DEFAULT_RANDOM_SEED: u64 = 26;

/// 每周前 5 天视为工作日
const BUSINESS_DAYS_PER_WEEK: usize = 5;
/// 工作日的前 8 个小时视为工作时间
const BUSINESS_HOURS_PER_DAY: usize = 8;

/// 序列形状参数（与统计项无关的部分）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesShape {
    /// 工作时间每小时的基准值
    pub business_hours_base: f64,
    /// 非工作时间每小时的基准值
    pub non_business_hours_base: f64,
    /// 整个区间的总增长倍数（最后一个点 / 第一个点）
    pub growth: f64,
    /// 噪声自相关系数，0 为白噪声
    pub autocorrelation: f64,
    /// 噪声强度
    pub spikiness: f64,
    /// 每天成为假日（值为 0）的概率
    pub holiday_rate: f64,
}

impl SeriesShape {
    pub fn new(
        business_hours_base: f64,
        non_business_hours_base: f64,
        growth: f64,
        autocorrelation: f64,
        spikiness: f64,
    ) -> Self {
        Self {
            business_hours_base,
            non_business_hours_base,
            growth,
            autocorrelation,
            spikiness,
            holiday_rate: 0.0,
        }
    }

    pub fn with_holiday_rate(mut self, holiday_rate: f64) -> Self {
        self.holiday_rate = holiday_rate;
        self
    }
}

/// 完整的生成参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesParams {
    pub days: u32,
    pub shape: SeriesShape,
    pub frequency: Frequency,
    /// 累计量：生成后取前缀最大值，保证单调不减
    pub is_gauge: bool,
    pub random_seed: u64,
}

impl SeriesParams {
    /// 按统计项的频率和聚合方式构造参数
    pub fn for_stat(stat: &CountStat, days: u32, shape: SeriesShape, random_seed: u64) -> Self {
        Self {
            days,
            shape,
            frequency: stat.frequency,
            is_gauge: stat.is_gauge(),
            random_seed,
        }
    }

    /// 序列长度（点数）
    pub fn length(&self) -> usize {
        match self.frequency {
            Frequency::Hour => self.days as usize * 24,
            Frequency::Day => self.days as usize,
        }
    }

    fn validate(&self) -> Result<()> {
        let length = self.length();
        if length < 2 {
            return Err(AnalyticsError::validation(format!(
                "Must be generating at least 2 data points. Currently generating {}",
                length
            )));
        }

        let shape = &self.shape;
        let finite = [
            shape.business_hours_base,
            shape.non_business_hours_base,
            shape.growth,
            shape.autocorrelation,
            shape.spikiness,
            shape.holiday_rate,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(AnalyticsError::validation("参数必须是有限数值"));
        }
        if shape.business_hours_base < 0.0 || shape.non_business_hours_base < 0.0 {
            return Err(AnalyticsError::validation("基准值不能为负数"));
        }
        if shape.growth < 0.0 {
            return Err(AnalyticsError::validation(format!(
                "growth 不能为负数: {}",
                shape.growth
            )));
        }
        if !(0.0..=1.0).contains(&shape.holiday_rate) {
            return Err(AnalyticsError::validation(format!(
                "holiday_rate 必须在 [0, 1] 内: {}",
                shape.holiday_rate
            )));
        }
        Ok(())
    }
}

/// 一周内每个位置的基准值
///
/// 小时频率：168 个槽位，前 5 天的前 8 小时为工作时间。
/// 天频率：7 个槽位，工作日 = 8 × 工作时间 + 16 × 非工作时间，周末 = 24 × 非工作时间。
fn weekly_seasonality(frequency: Frequency, shape: &SeriesShape) -> Vec<f64> {
    let bh = shape.business_hours_base;
    let nbh = shape.non_business_hours_base;

    match frequency {
        Frequency::Hour => {
            let mut seasonality = vec![nbh; 24 * 7];
            for day in 0..BUSINESS_DAYS_PER_WEEK {
                for hour in 0..BUSINESS_HOURS_PER_DAY {
                    seasonality[24 * day + hour] = bh;
                }
            }
            seasonality
        }
        Frequency::Day => {
            let business_day = BUSINESS_HOURS_PER_DAY as f64 * bh
                + (24 - BUSINESS_HOURS_PER_DAY) as f64 * nbh;
            let mut seasonality = vec![business_day; BUSINESS_DAYS_PER_WEEK];
            seasonality.extend([24.0 * nbh; 7 - BUSINESS_DAYS_PER_WEEK]);
            seasonality
        }
    }
}

/// 每个点是否落在假日（按天抽样，小时频率下整天 24 个点相同）
fn holiday_mask(rng: &mut StdRng, params: &SeriesParams) -> Vec<bool> {
    let points_per_day = match params.frequency {
        Frequency::Hour => 24,
        Frequency::Day => 1,
    };

    let mut mask = Vec::with_capacity(params.length());
    for _ in 0..params.days {
        let is_holiday = rng.random::<f64>() < params.shape.holiday_rate;
        mask.extend(std::iter::repeat_n(is_holiday, points_per_day));
    }
    mask
}

/// 标准正态分布采样（Box-Muller）
fn standard_normal(rng: &mut StdRng) -> f64 {
    // u1 ∈ (0, 1]，避免 ln(0)
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}

/// 一阶自回归噪声：n[i] = n[i-1] * a + N(0,1) * (1 - a)
fn autocorrelated_noise(rng: &mut StdRng, length: usize, autocorrelation: f64) -> Vec<f64> {
    let mut noise = Vec::with_capacity(length);
    let mut previous = standard_normal(rng);
    noise.push(previous);
    for _ in 1..length {
        previous = previous * autocorrelation + standard_normal(rng) * (1.0 - autocorrelation);
        noise.push(previous);
    }
    noise
}

/// 生成合成时间序列
///
/// 返回值全部非负。gauge 序列单调不减。
pub fn generate_time_series_data(params: &SeriesParams) -> Result<Vec<i64>> {
    params.validate()?;

    let length = params.length();
    let shape = &params.shape;
    let seasonality = weekly_seasonality(params.frequency, shape);

    let growth_base = shape.growth.powf(1.0 / (length - 1) as f64);
    let values_no_noise = (0..length).map(|i| {
        seasonality[i % seasonality.len()] * growth_base.powi(i as i32)
    });

    let mut rng = StdRng::seed_from_u64(params.random_seed);
    let holidays = holiday_mask(&mut rng, params);
    let noise = autocorrelated_noise(&mut rng, length, shape.autocorrelation);

    let mut values: Vec<i64> = values_no_noise
        .zip(noise)
        .zip(holidays)
        .map(|((v, n), holiday)| {
            if holiday {
                0
            } else {
                (v + v.sqrt() * n * shape.spikiness) as i64
            }
        })
        .collect();

    if params.is_gauge {
        for i in 1..values.len() {
            values[i] = values[i].max(values[i - 1]);
        }
    }

    Ok(values.into_iter().map(|v| v.max(0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_params(shape: SeriesShape) -> SeriesParams {
        SeriesParams {
            days: 100,
            shape,
            frequency: Frequency::Day,
            is_gauge: false,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }

    #[test]
    fn test_length_by_frequency() {
        let shape = SeriesShape::new(2.0, 1.0, 1.5, 0.6, 8.0);
        let day = generate_time_series_data(&day_params(shape)).unwrap();
        assert_eq!(day.len(), 100);

        let hour = generate_time_series_data(&SeriesParams {
            frequency: Frequency::Hour,
            ..day_params(shape)
        })
        .unwrap();
        assert_eq!(hour.len(), 2400);
    }

    #[test]
    fn test_same_seed_same_series() {
        let shape = SeriesShape::new(30.0, 8.0, 5.0, 0.6, 4.0);
        let a = generate_time_series_data(&day_params(shape)).unwrap();
        let b = generate_time_series_data(&day_params(shape)).unwrap();
        assert_eq!(a, b);

        let c = generate_time_series_data(&SeriesParams {
            random_seed: 7,
            ..day_params(shape)
        })
        .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_values_are_non_negative() {
        // 高噪声、低基准，原始值会频繁为负
        let shape = SeriesShape::new(0.1, 0.03, 3.0, 0.5, 30.0);
        let values = generate_time_series_data(&day_params(shape)).unwrap();
        assert!(values.iter().all(|v| *v >= 0));
    }

    #[test]
    fn test_gauge_is_non_decreasing() {
        let shape = SeriesShape::new(0.1, 0.03, 3.0, 0.5, 3.0);
        let values = generate_time_series_data(&SeriesParams {
            is_gauge: true,
            ..day_params(shape)
        })
        .unwrap();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_zero_base_yields_all_zero() {
        let shape = SeriesShape::new(0.0, 0.0, 0.0, 0.0, 0.0);
        let values = generate_time_series_data(&day_params(shape)).unwrap();
        assert!(values.iter().all(|v| *v == 0));
    }

    #[test]
    fn test_noise_free_series_follows_seasonality_and_growth() {
        let shape = SeriesShape::new(10.0, 1.0, 1.0, 0.0, 0.0);
        let values = generate_time_series_data(&SeriesParams {
            days: 14,
            ..day_params(shape)
        })
        .unwrap();
        // 工作日 8*10 + 16*1 = 96，周末 24*1 = 24
        assert_eq!(&values[..7], &[96, 96, 96, 96, 96, 24, 24]);
        assert_eq!(&values[7..], &values[..7]);
    }

    #[test]
    fn test_growth_scales_last_point() {
        let shape = SeriesShape::new(1.0, 1.0, 4.0, 0.0, 0.0);
        let values = generate_time_series_data(&SeriesParams {
            days: 7,
            ..day_params(shape)
        })
        .unwrap();
        // seasonality 恒为 24，最后一个点放大 4 倍（浮点误差允许截断到 95）
        assert_eq!(values[0], 24);
        assert!((95..=96).contains(&values[6]), "got {}", values[6]);
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_holiday_rate_one_zeroes_everything() {
        let shape = SeriesShape::new(35.0, 15.0, 6.0, 0.6, 4.0).with_holiday_rate(1.0);
        let values = generate_time_series_data(&SeriesParams {
            frequency: Frequency::Hour,
            ..day_params(shape)
        })
        .unwrap();
        assert!(values.iter().all(|v| *v == 0));
    }

    #[test]
    fn test_hourly_holidays_cover_whole_days() {
        let shape = SeriesShape::new(2.0, 1.0, 1.5, 0.6, 8.0).with_holiday_rate(0.1);
        let params = SeriesParams {
            frequency: Frequency::Hour,
            ..day_params(shape)
        };
        let mut rng = StdRng::seed_from_u64(params.random_seed);
        let mask = holiday_mask(&mut rng, &params);
        assert_eq!(mask.len(), 2400);
        for day in mask.chunks(24) {
            assert!(day.iter().all(|h| *h == day[0]));
        }
    }

    #[test]
    fn test_too_short_series_rejected() {
        let shape = SeriesShape::new(1.0, 1.0, 1.0, 0.0, 1.0);
        let err = generate_time_series_data(&SeriesParams {
            days: 1,
            ..day_params(shape)
        })
        .unwrap_err();
        assert!(matches!(err, AnalyticsError::Validation(_)));

        // 小时频率下 1 天 = 24 个点，允许
        assert!(
            generate_time_series_data(&SeriesParams {
                days: 1,
                frequency: Frequency::Hour,
                ..day_params(shape)
            })
            .is_ok()
        );
    }

    #[test]
    fn test_invalid_shape_rejected() {
        let negative_growth = SeriesShape::new(1.0, 1.0, -1.0, 0.0, 1.0);
        assert!(generate_time_series_data(&day_params(negative_growth)).is_err());

        let bad_holiday = SeriesShape::new(1.0, 1.0, 1.0, 0.0, 1.0).with_holiday_rate(1.5);
        assert!(generate_time_series_data(&day_params(bad_holiday)).is_err());

        let nan_base = SeriesShape::new(f64::NAN, 1.0, 1.0, 0.0, 1.0);
        assert!(generate_time_series_data(&day_params(nan_base)).is_err());
    }
}
