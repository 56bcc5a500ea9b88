//! Analytics 统计定义与数据生成
//!
//! - `counts`: 统计项注册表（property -> 频率 / 聚合方式 / 归属表）
//! - `time_utils`: 时间分桶
//! - `fixtures`: 合成时间序列生成器

pub mod counts;
pub mod fixtures;
pub mod time_utils;

pub use counts::{
    COUNT_STATS, CountStat, CountTable, Frequency, Interval, do_drop_all_analytics_tables,
    get_count_stat,
};
pub use fixtures::{SeriesParams, SeriesShape, generate_time_series_data};
pub use time_utils::{floor_to_day, floor_to_hour, time_range};
