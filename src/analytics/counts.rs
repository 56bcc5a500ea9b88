//! 统计项注册表
//!
//! 每个 `CountStat` 描述一个按时间分桶的指标：分桶频率、聚合方式，
//! 以及它的数据写入哪张计数表。

use std::collections::HashMap;

use once_cell::sync::Lazy;
use sea_orm::{ConnectionTrait, EntityTrait};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, info};

use crate::errors::{AnalyticsError, Result};
use migration::entities::{fill_state, installation_count, realm_count, stream_count, user_count};

/// 分桶频率
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, AsRefStr, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Frequency {
    Hour,
    Day,
}

/// 聚合区间
///
/// `Gauge` 表示该值是截至 end_time 的累计量，而不是区间内的增量。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Interval {
    Gauge,
    Hour,
    Day,
}

/// 计数行归属的表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, AsRefStr, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CountTable {
    InstallationCount,
    RealmCount,
    UserCount,
    StreamCount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountStat {
    pub property: &'static str,
    pub frequency: Frequency,
    pub interval: Interval,
    pub table: CountTable,
}

impl CountStat {
    const fn new(
        property: &'static str,
        frequency: Frequency,
        interval: Interval,
        table: CountTable,
    ) -> Self {
        Self {
            property,
            frequency,
            interval,
            table,
        }
    }

    pub fn is_gauge(&self) -> bool {
        self.interval == Interval::Gauge
    }
}

const STAT_DEFINITIONS: &[CountStat] = &[
    CountStat::new(
        "active_users:is_bot:day",
        Frequency::Day,
        Interval::Gauge,
        CountTable::RealmCount,
    ),
    CountStat::new(
        "messages_sent:is_bot:hour",
        Frequency::Hour,
        Interval::Hour,
        CountTable::UserCount,
    ),
    CountStat::new(
        "messages_sent:message_type:day",
        Frequency::Day,
        Interval::Day,
        CountTable::UserCount,
    ),
    CountStat::new(
        "messages_sent:client:day",
        Frequency::Day,
        Interval::Day,
        CountTable::UserCount,
    ),
    CountStat::new(
        "messages_in_stream:is_bot:day",
        Frequency::Day,
        Interval::Day,
        CountTable::StreamCount,
    ),
    CountStat::new(
        "messages_sent_to_stream:is_bot:hour",
        Frequency::Hour,
        Interval::Hour,
        CountTable::StreamCount,
    ),
];

/// property -> CountStat
pub static COUNT_STATS: Lazy<HashMap<&'static str, CountStat>> = Lazy::new(|| {
    STAT_DEFINITIONS
        .iter()
        .map(|stat| (stat.property, stat.clone()))
        .collect()
});

/// 按 property 查找统计项
pub fn get_count_stat(property: &str) -> Result<&'static CountStat> {
    COUNT_STATS
        .get(property)
        .ok_or_else(|| AnalyticsError::not_found(format!("未知的统计项: {}", property)))
}

/// 清空所有计数表和填充进度
///
/// 返回删除的总行数。
pub async fn do_drop_all_analytics_tables<C: ConnectionTrait>(db: &C) -> Result<u64> {
    let mut deleted = 0;

    deleted += user_count::Entity::delete_many().exec(db).await?.rows_affected;
    deleted += stream_count::Entity::delete_many().exec(db).await?.rows_affected;
    deleted += realm_count::Entity::delete_many()
        .exec(db)
        .await?
        .rows_affected;
    deleted += installation_count::Entity::delete_many()
        .exec(db)
        .await?
        .rows_affected;

    let fill_states = fill_state::Entity::delete_many()
        .exec(db)
        .await?
        .rows_affected;
    debug!("Dropped {} fill_state rows", fill_states);

    info!("Dropped {} rows from analytics count tables", deleted);
    Ok(deleted + fill_states)
}
