//! 计数行构建与批量写入

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, EntityTrait, Set};
use tracing::debug;

use crate::analytics::{CountStat, CountTable, time_range};
use crate::errors::{AnalyticsError, Result};
use migration::entities::{fill_state, realm_count, stream_count, user_count};

/// 一个统计项的全部子分组序列：(subgroup, values)
pub type FixtureData = Vec<(String, Vec<i64>)>;

/// 计数行归属
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountOwner {
    Realm { realm_id: i32 },
    User { realm_id: i32, user_id: i32 },
    Stream { realm_id: i32, stream_id: i32 },
}

impl CountOwner {
    /// 写入的目标表
    pub fn table(&self) -> CountTable {
        match self {
            CountOwner::Realm { .. } => CountTable::RealmCount,
            CountOwner::User { .. } => CountTable::UserCount,
            CountOwner::Stream { .. } => CountTable::StreamCount,
        }
    }

    /// realm 级汇总对所有统计项有效；user / stream 行只能写入声明在对应表上的统计项
    fn accepts(&self, stat: &CountStat) -> bool {
        matches!(self, CountOwner::Realm { .. }) || self.table() == stat.table
    }
}

/// 与归属无关的计数行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRow {
    pub subgroup: Option<String>,
    pub end_time: DateTime<Utc>,
    pub value: i64,
}

/// 把序列展开成计数行，丢弃值为 0 的点
///
/// 每条序列的长度必须与 `end_times` 一致。
pub fn build_rows(end_times: &[DateTime<Utc>], fixture_data: &FixtureData) -> Result<Vec<CountRow>> {
    let mut rows = Vec::new();
    for (subgroup, values) in fixture_data {
        if values.len() != end_times.len() {
            return Err(AnalyticsError::validation(format!(
                "子分组 '{}' 的序列长度 {} 与时间点数量 {} 不一致",
                subgroup,
                values.len(),
                end_times.len()
            )));
        }

        rows.extend(
            end_times
                .iter()
                .zip(values)
                .filter(|(_, value)| **value != 0)
                .map(|(end_time, value)| CountRow {
                    subgroup: Some(subgroup.clone()),
                    end_time: *end_time,
                    value: *value,
                }),
        );
    }
    Ok(rows)
}

/// 写入一个统计项的数据，返回插入的行数
///
/// 时间轴以 `last_end_time` 结尾，长度取第一条序列的长度。
pub async fn insert_fixture_data<C: ConnectionTrait>(
    db: &C,
    stat: &CountStat,
    fixture_data: &FixtureData,
    owner: CountOwner,
    last_end_time: DateTime<Utc>,
    batch_size: usize,
) -> Result<u64> {
    if !owner.accepts(stat) {
        return Err(AnalyticsError::validation(format!(
            "统计项 {} 不能写入 {}",
            stat.property,
            owner.table()
        )));
    }

    let Some((_, first)) = fixture_data.first() else {
        return Ok(0);
    };

    let end_times = time_range(
        last_end_time,
        last_end_time,
        stat.frequency,
        Some(first.len()),
    );
    let rows = build_rows(&end_times, fixture_data)?;
    let inserted = insert_rows(db, stat.property, owner, rows, batch_size.max(1)).await?;

    debug!(
        "Inserted {} {} rows for {}",
        inserted,
        owner.table(),
        stat.property
    );
    Ok(inserted)
}

async fn insert_rows<C: ConnectionTrait>(
    db: &C,
    property: &str,
    owner: CountOwner,
    rows: Vec<CountRow>,
    batch_size: usize,
) -> Result<u64> {
    let mut inserted = 0u64;

    for chunk in rows.chunks(batch_size) {
        match owner {
            CountOwner::Realm { realm_id } => {
                let models = chunk.iter().map(|row| realm_count::ActiveModel {
                    property: Set(property.to_string()),
                    subgroup: Set(row.subgroup.clone()),
                    end_time: Set(row.end_time),
                    value: Set(row.value),
                    realm_id: Set(realm_id),
                    ..Default::default()
                });
                realm_count::Entity::insert_many(models).exec(db).await?;
            }
            CountOwner::User { realm_id, user_id } => {
                let models = chunk.iter().map(|row| user_count::ActiveModel {
                    property: Set(property.to_string()),
                    subgroup: Set(row.subgroup.clone()),
                    end_time: Set(row.end_time),
                    value: Set(row.value),
                    realm_id: Set(realm_id),
                    user_id: Set(user_id),
                    ..Default::default()
                });
                user_count::Entity::insert_many(models).exec(db).await?;
            }
            CountOwner::Stream {
                realm_id,
                stream_id,
            } => {
                let models = chunk.iter().map(|row| stream_count::ActiveModel {
                    property: Set(property.to_string()),
                    subgroup: Set(row.subgroup.clone()),
                    end_time: Set(row.end_time),
                    value: Set(row.value),
                    realm_id: Set(realm_id),
                    stream_id: Set(stream_id),
                    ..Default::default()
                });
                stream_count::Entity::insert_many(models).exec(db).await?;
            }
        }
        inserted += chunk.len() as u64;
    }

    Ok(inserted)
}

/// 标记统计项已填充到 `end_time`
pub async fn mark_filled<C: ConnectionTrait>(
    db: &C,
    properties: &[&str],
    end_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<u64> {
    if properties.is_empty() {
        return Ok(0);
    }

    let models = properties.iter().map(|property| fill_state::ActiveModel {
        property: Set(property.to_string()),
        end_time: Set(end_time),
        state: Set(fill_state::DONE),
        last_modified: Set(now),
        ..Default::default()
    });
    fill_state::Entity::insert_many(models).exec(db).await?;

    Ok(properties.len() as u64)
}
