//! 时间分桶工具
//!
//! 所有时间均为 UTC。一个桶用它的结束时间（end_time）表示。

use chrono::{DateTime, Duration, DurationRound, TimeDelta, Utc};

use super::counts::Frequency;

/// 截断到整点
pub fn floor_to_hour(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.duration_trunc(TimeDelta::hours(1)).unwrap_or(dt)
}

/// 截断到当天零点
pub fn floor_to_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.duration_trunc(TimeDelta::days(1)).unwrap_or(dt)
}

impl Frequency {
    /// 相邻两个桶的间隔
    pub fn step(self) -> Duration {
        match self {
            Frequency::Hour => Duration::hours(1),
            Frequency::Day => Duration::days(1),
        }
    }

    /// 把时间截断到该频率的桶边界
    pub fn floor(self, dt: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Frequency::Hour => floor_to_hour(dt),
            Frequency::Day => floor_to_day(dt),
        }
    }
}

/// 生成 [start, end] 内的所有桶结束时间（升序）
///
/// `end` 先按频率截断。若给出 `min_length`，start 会被提前，
/// 确保至少返回 `min_length` 个点。
pub fn time_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    frequency: Frequency,
    min_length: Option<usize>,
) -> Vec<DateTime<Utc>> {
    let end = frequency.floor(end);
    let step = frequency.step();

    let start = match min_length {
        Some(len) if len > 0 => start.min(end - step * (len as i32 - 1)),
        _ => start,
    };

    let mut times = Vec::new();
    let mut current = end;
    while current >= start {
        times.push(current);
        current -= step;
    }
    times.reverse();
    times
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_floor_to_hour_and_day() {
        let dt = utc(2026, 10, 14, 15, 42);
        assert_eq!(floor_to_hour(dt), utc(2026, 10, 14, 15, 0));
        assert_eq!(floor_to_day(dt), utc(2026, 10, 14, 0, 0));
        assert_eq!(floor_to_day(floor_to_day(dt)), floor_to_day(dt));
    }

    #[test]
    fn test_time_range_min_length_day() {
        let end = utc(2026, 10, 14, 9, 30);
        let times = time_range(end, end, Frequency::Day, Some(5));
        assert_eq!(times.len(), 5);
        assert_eq!(times[4], utc(2026, 10, 14, 0, 0));
        assert_eq!(times[0], utc(2026, 10, 10, 0, 0));
        assert!(times.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));
    }

    #[test]
    fn test_time_range_min_length_hour() {
        let end = utc(2026, 10, 14, 0, 0);
        let times = time_range(end, end, Frequency::Hour, Some(48));
        assert_eq!(times.len(), 48);
        assert_eq!(times[0], utc(2026, 10, 12, 1, 0));
        assert_eq!(*times.last().unwrap(), end);
    }

    #[test]
    fn test_time_range_start_earlier_than_min_length() {
        let start = utc(2026, 10, 1, 0, 0);
        let end = utc(2026, 10, 14, 0, 0);
        let times = time_range(start, end, Frequency::Day, Some(3));
        assert_eq!(times.len(), 14);
        assert_eq!(times[0], start);
    }

    #[test]
    fn test_time_range_start_after_end_is_empty() {
        let start = utc(2026, 10, 15, 0, 0);
        let end = utc(2026, 10, 14, 0, 0);
        assert!(time_range(start, end, Frequency::Day, None).is_empty());
    }
}
