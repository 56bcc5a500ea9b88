//! 演示数据填充
//!
//! 流程：
//! 1. 清空所有计数表和填充进度
//! 2. 删除上一次运行留下的测试 realm / 客户端
//! 3. 创建 realm、用户、频道
//! 4. 按固定计划生成序列并写入 realm_count / user_count / stream_count
//! 5. 创建客户端并写入按客户端分组的统计
//! 6. 标记所有写入过的统计项为已填充
//!
//! 全部步骤在同一个事务中执行，任何一步失败都会回滚。

mod entities;
mod insert;

pub use entities::{
    FIXTURE_CLIENT_NAMES, REALM_DOMAIN, REALM_NAME, STREAM_NAME, create_clients, create_realm,
    create_stream, create_user, drop_fixture_entities, fixture_user_email, is_fixture_client_name,
};
pub use insert::{CountOwner, CountRow, FixtureData, build_rows, insert_fixture_data, mark_filled};

use chrono::{DateTime, Duration, Utc};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::info;

use crate::analytics::{
    SeriesParams, SeriesShape, do_drop_all_analytics_tables, floor_to_day,
    generate_time_series_data, get_count_stat,
};
use crate::config::FixturesConfig;
use crate::errors::{AnalyticsError, Result};

/// 最多生成的天数
pub const MAX_DAYS_OF_DATA: u32 = 3650;

/// 单次运行参数
#[derive(Debug, Clone)]
pub struct PopulateOptions {
    pub days: u32,
    pub random_seed: u64,
    pub realm_string_id: String,
    pub batch_size: usize,
    /// 运行时刻，最后一个桶为当天零点
    pub now: DateTime<Utc>,
}

impl PopulateOptions {
    pub fn from_config(config: &FixturesConfig) -> Self {
        Self {
            days: config.days_of_data,
            random_seed: config.random_seed,
            realm_string_id: config.realm_string_id.clone(),
            batch_size: config.insert_batch_size,
            now: Utc::now(),
        }
    }

    /// 最后一个桶的结束时间
    pub fn last_end_time(&self) -> DateTime<Utc> {
        floor_to_day(self.now)
    }

    /// realm / 用户的创建时间
    pub fn installation_time(&self) -> Result<DateTime<Utc>> {
        Duration::try_days(self.days as i64)
            .and_then(|days| self.now.checked_sub_signed(days))
            .ok_or_else(|| {
                AnalyticsError::validation(format!("days 超出可表示的时间范围: {}", self.days))
            })
    }

    /// 在开启事务前检查参数
    pub fn validate(&self) -> Result<()> {
        if self.realm_string_id.is_empty() {
            return Err(AnalyticsError::validation("realm_string_id 不能为空"));
        }
        if self.days > MAX_DAYS_OF_DATA {
            return Err(AnalyticsError::validation(format!(
                "days 不能超过 {}: {}",
                MAX_DAYS_OF_DATA, self.days
            )));
        }
        self.installation_time()?;
        Ok(())
    }
}

/// 运行结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PopulateSummary {
    pub realm_id: i32,
    pub user_id: i32,
    pub stream_id: i32,
    pub client_ids: Vec<i32>,
    pub dropped_rows: u64,
    pub realm_count_rows: u64,
    pub user_count_rows: u64,
    pub stream_count_rows: u64,
    pub fill_state_rows: u64,
}

impl PopulateSummary {
    pub fn total_count_rows(&self) -> u64 {
        self.realm_count_rows + self.user_count_rows + self.stream_count_rows
    }

    fn record(&mut self, owner: CountOwner, rows: u64) {
        match owner {
            CountOwner::Realm { .. } => self.realm_count_rows += rows,
            CountOwner::User { .. } => self.user_count_rows += rows,
            CountOwner::Stream { .. } => self.stream_count_rows += rows,
        }
    }
}

/// 一个统计项在某个归属下的所有子分组
struct SeriesGroup {
    owner: CountOwner,
    series: Vec<(String, SeriesShape)>,
}

fn shape(bh: f64, nbh: f64, growth: f64, autocorrelation: f64, spikiness: f64) -> SeriesShape {
    SeriesShape::new(bh, nbh, growth, autocorrelation, spikiness)
}

fn subgroups(series: &[(&str, SeriesShape)]) -> Vec<(String, SeriesShape)> {
    series
        .iter()
        .map(|(subgroup, shape)| (subgroup.to_string(), *shape))
        .collect()
}

/// 按计划为一个统计项生成数据并写入
async fn seed_stat<C: sea_orm::ConnectionTrait>(
    db: &C,
    property: &str,
    groups: Vec<SeriesGroup>,
    options: &PopulateOptions,
    summary: &mut PopulateSummary,
) -> Result<()> {
    let stat = get_count_stat(property)?;

    for group in groups {
        let mut fixture_data: FixtureData = Vec::with_capacity(group.series.len());
        for (subgroup, shape) in group.series {
            let params = SeriesParams::for_stat(stat, options.days, shape, options.random_seed);
            fixture_data.push((subgroup, generate_time_series_data(&params)?));
        }

        let rows = insert_fixture_data(
            db,
            stat,
            &fixture_data,
            group.owner,
            options.last_end_time(),
            options.batch_size,
        )
        .await?;
        summary.record(group.owner, rows);
    }

    Ok(())
}

/// 清空计数表并删除测试实体
pub async fn drop_all<C: sea_orm::ConnectionTrait>(db: &C, realm_string_id: &str) -> Result<u64> {
    let dropped = do_drop_all_analytics_tables(db).await?;
    drop_fixture_entities(db, realm_string_id).await?;
    Ok(dropped)
}

/// 执行一次完整的填充
pub async fn populate(db: &DatabaseConnection, options: &PopulateOptions) -> Result<PopulateSummary> {
    options.validate()?;

    info!(
        "Populating {} days of analytics data (seed={}, realm='{}')",
        options.days, options.random_seed, options.realm_string_id
    );

    let txn = db.begin().await.map_err(|e| {
        AnalyticsError::database_operation(format!("开始事务失败: {}", e))
    })?;

    let mut summary = PopulateSummary {
        dropped_rows: drop_all(&txn, &options.realm_string_id).await?,
        ..Default::default()
    };

    let installation_time = options.installation_time()?;
    let last_end_time = options.last_end_time();

    let realm = create_realm(&txn, &options.realm_string_id, installation_time).await?;
    let user = create_user(&txn, &realm, installation_time).await?;
    let stream = create_stream(&txn, &realm, installation_time).await?;
    summary.realm_id = realm.id;
    summary.user_id = user.id;
    summary.stream_id = stream.id;

    let realm_owner = CountOwner::Realm { realm_id: realm.id };
    let user_owner = CountOwner::User {
        realm_id: realm.id,
        user_id: user.id,
    };
    let stream_owner = CountOwner::Stream {
        realm_id: realm.id,
        stream_id: stream.id,
    };

    seed_stat(
        &txn,
        "active_users:is_bot:day",
        vec![SeriesGroup {
            owner: realm_owner,
            series: subgroups(&[
                ("false", shape(0.1, 0.03, 3.0, 0.5, 3.0)),
                ("true", shape(0.01, 0.0, 1.0, 0.0, 1.0)),
            ]),
        }],
        options,
        &mut summary,
    )
    .await?;

    seed_stat(
        &txn,
        "messages_sent:is_bot:hour",
        vec![
            SeriesGroup {
                owner: user_owner,
                series: subgroups(&[(
                    "false",
                    shape(2.0, 1.0, 1.5, 0.6, 8.0).with_holiday_rate(0.1),
                )]),
            },
            SeriesGroup {
                owner: realm_owner,
                series: subgroups(&[
                    ("false", shape(35.0, 15.0, 6.0, 0.6, 4.0)),
                    ("true", shape(15.0, 15.0, 3.0, 0.4, 2.0)),
                ]),
            },
        ],
        options,
        &mut summary,
    )
    .await?;

    seed_stat(
        &txn,
        "messages_sent:message_type:day",
        vec![
            SeriesGroup {
                owner: user_owner,
                series: subgroups(&[
                    ("public_stream", shape(1.5, 1.0, 3.0, 0.6, 8.0)),
                    ("private_message", shape(0.5, 0.3, 1.0, 0.6, 8.0)),
                ]),
            },
            SeriesGroup {
                owner: realm_owner,
                series: subgroups(&[
                    ("public_stream", shape(30.0, 8.0, 5.0, 0.6, 4.0)),
                    ("private_stream", shape(7.0, 7.0, 5.0, 0.6, 4.0)),
                    ("private_message", shape(13.0, 5.0, 5.0, 0.6, 4.0)),
                ]),
            },
        ],
        options,
        &mut summary,
    )
    .await?;

    seed_stat(
        &txn,
        "messages_in_stream:is_bot:day",
        vec![SeriesGroup {
            owner: stream_owner,
            series: subgroups(&[
                ("false", shape(30.0, 5.0, 6.0, 0.6, 4.0)),
                ("true", shape(20.0, 2.0, 3.0, 0.2, 3.0)),
            ]),
        }],
        options,
        &mut summary,
    )
    .await?;

    // 按客户端分组的统计以客户端 id 作为 subgroup
    let clients = create_clients(&txn).await?;
    let client_id = |name: &str| -> Result<String> {
        clients
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id.to_string())
            .ok_or_else(|| AnalyticsError::not_found(format!("客户端 {} 未创建", name)))
    };

    let user_client_series = vec![
        (client_id("website_")?, shape(2.0, 1.0, 1.5, 0.6, 8.0)),
        (client_id("barnowl_")?, shape(0.0, 0.3, 1.5, 0.6, 8.0)),
    ];
    let realm_client_series = vec![
        (client_id("website_")?, shape(30.0, 20.0, 5.0, 0.6, 3.0)),
        (client_id("API_")?, shape(5.0, 5.0, 5.0, 0.6, 3.0)),
        (client_id("android_")?, shape(5.0, 5.0, 2.0, 0.6, 3.0)),
        (client_id("iOS_")?, shape(5.0, 5.0, 2.0, 0.6, 3.0)),
        (client_id("react_native_")?, shape(5.0, 5.0, 10.0, 0.6, 3.0)),
        (client_id("electron_")?, shape(5.0, 3.0, 8.0, 0.6, 3.0)),
        (client_id("barnowl_")?, shape(1.0, 1.0, 3.0, 0.6, 3.0)),
        (client_id("plan9_")?, shape(0.0, 0.0, 0.0, 0.0, 0.0)),
    ];
    summary.client_ids = clients.iter().map(|c| c.id).collect();

    seed_stat(
        &txn,
        "messages_sent:client:day",
        vec![
            SeriesGroup {
                owner: user_owner,
                series: user_client_series,
            },
            SeriesGroup {
                owner: realm_owner,
                series: realm_client_series,
            },
        ],
        options,
        &mut summary,
    )
    .await?;

    summary.fill_state_rows = mark_filled(
        &txn,
        &[
            "active_users:is_bot:day",
            "messages_sent:is_bot:hour",
            "messages_sent:message_type:day",
            "messages_in_stream:is_bot:day",
            "messages_sent:client:day",
        ],
        last_end_time,
        options.now,
    )
    .await?;

    txn.commit().await.map_err(|e| {
        AnalyticsError::database_operation(format!("提交事务失败: {}", e))
    })?;

    info!(
        "Populated {} count rows (realm={}, user={}, stream={})",
        summary.total_count_rows(),
        summary.realm_count_rows,
        summary.user_count_rows,
        summary.stream_count_rows
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_options_time_window() {
        let options = PopulateOptions {
            days: 100,
            random_seed: 26,
            realm_string_id: "analytics".to_string(),
            batch_size: 500,
            now: Utc.with_ymd_and_hms(2026, 10, 14, 15, 42, 7).unwrap(),
        };

        assert_eq!(
            options.last_end_time(),
            Utc.with_ymd_and_hms(2026, 10, 14, 0, 0, 0).unwrap()
        );
        assert_eq!(
            options.installation_time().unwrap(),
            Utc.with_ymd_and_hms(2026, 7, 6, 15, 42, 7).unwrap()
        );
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_huge_day_count_is_rejected_not_panicking() {
        let options = PopulateOptions {
            days: 100_000_000,
            random_seed: 26,
            realm_string_id: "analytics".to_string(),
            batch_size: 500,
            now: Utc.with_ymd_and_hms(2026, 10, 14, 15, 42, 7).unwrap(),
        };

        assert!(matches!(
            options.installation_time(),
            Err(AnalyticsError::Validation(_))
        ));
        assert!(matches!(
            options.validate(),
            Err(AnalyticsError::Validation(_))
        ));

        let at_limit = PopulateOptions {
            days: MAX_DAYS_OF_DATA,
            ..options.clone()
        };
        assert!(at_limit.validate().is_ok());
        let over_limit = PopulateOptions {
            days: MAX_DAYS_OF_DATA + 1,
            ..options
        };
        assert!(over_limit.validate().is_err());
    }

    #[test]
    fn test_options_from_config() {
        let options = PopulateOptions::from_config(&FixturesConfig::default());
        assert_eq!(options.days, 100);
        assert_eq!(options.random_seed, 26);
        assert_eq!(options.realm_string_id, "analytics");
    }

    #[test]
    fn test_summary_record() {
        let mut summary = PopulateSummary::default();
        summary.record(CountOwner::Realm { realm_id: 1 }, 10);
        summary.record(
            CountOwner::User {
                realm_id: 1,
                user_id: 1,
            },
            5,
        );
        assert_eq!(summary.realm_count_rows, 10);
        assert_eq!(summary.total_count_rows(), 15);
    }
}
