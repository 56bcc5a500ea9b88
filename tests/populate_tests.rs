//! Populate integration tests
//!
//! Runs the full populate against temporary SQLite databases.

use std::collections::HashSet;

use analytics_populator::config::DatabaseConfig;
use analytics_populator::errors::AnalyticsError;
use analytics_populator::populate::{
    FIXTURE_CLIENT_NAMES, MAX_DAYS_OF_DATA, PopulateOptions, PopulateSummary, drop_all, populate,
};
use analytics_populator::storage::connect;
use chrono::{DateTime, Duration, TimeZone, Utc};
use migration::entities::{
    client, fill_state, realm, realm_count, stream_count, user_count, user_profile,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tempfile::TempDir;

const DAYS: u32 = 14;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 15, 30, 0).unwrap()
}

fn test_options() -> PopulateOptions {
    PopulateOptions {
        days: DAYS,
        random_seed: 26,
        realm_string_id: "analytics".to_string(),
        batch_size: 100,
        now: fixed_now(),
    }
}

/// 创建临时 SQLite 数据库并执行迁移
async fn create_temp_db() -> (DatabaseConnection, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("analytics.db");
    let config = DatabaseConfig {
        database_url: format!("sqlite://{}?mode=rwc", db_path.display()),
        ..Default::default()
    };

    let db = connect(&config).await.expect("Failed to connect");
    (db, temp_dir)
}

async fn populate_default(db: &DatabaseConnection) -> PopulateSummary {
    populate(db, &test_options()).await.expect("populate failed")
}

#[tokio::test]
async fn test_populate_inserts_rows_into_every_table() {
    let (db, _dir) = create_temp_db().await;
    let summary = populate_default(&db).await;

    let realm_rows = realm_count::Entity::find().count(&db).await.unwrap();
    let user_rows = user_count::Entity::find().count(&db).await.unwrap();
    let stream_rows = stream_count::Entity::find().count(&db).await.unwrap();

    assert!(realm_rows > 0);
    assert!(user_rows > 0);
    assert!(stream_rows > 0);
    assert_eq!(summary.realm_count_rows, realm_rows);
    assert_eq!(summary.user_count_rows, user_rows);
    assert_eq!(summary.stream_count_rows, stream_rows);
}

#[tokio::test]
async fn test_no_zero_values_are_stored() {
    let (db, _dir) = create_temp_db().await;
    populate_default(&db).await;

    let zero_realm = realm_count::Entity::find()
        .filter(realm_count::Column::Value.eq(0))
        .count(&db)
        .await
        .unwrap();
    let zero_user = user_count::Entity::find()
        .filter(user_count::Column::Value.eq(0))
        .count(&db)
        .await
        .unwrap();
    let zero_stream = stream_count::Entity::find()
        .filter(stream_count::Column::Value.eq(0))
        .count(&db)
        .await
        .unwrap();

    assert_eq!(zero_realm + zero_user + zero_stream, 0);

    // plan9_ 的序列全部为 0，不应产生任何行
    let plan9 = client::Entity::find()
        .filter(client::Column::Name.eq("plan9_"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let plan9_rows = realm_count::Entity::find()
        .filter(realm_count::Column::Subgroup.eq(plan9.id.to_string()))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(plan9_rows, 0);
}

#[tokio::test]
async fn test_running_twice_leaves_one_fixture_realm() {
    let (db, _dir) = create_temp_db().await;
    let first = populate_default(&db).await;
    let second = populate_default(&db).await;

    let realms = realm::Entity::find()
        .filter(realm::Column::StringId.eq("analytics"))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(realms.len(), 1);
    assert_eq!(realms[0].id, second.realm_id);
    assert_ne!(first.realm_id, second.realm_id);

    let users = user_profile::Entity::find().all(&db).await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "shylock@analytics.ds");
    assert!(users[0].is_staff);

    let clients = client::Entity::find().count(&db).await.unwrap();
    assert_eq!(clients, FIXTURE_CLIENT_NAMES.len() as u64);

    // 第二次运行写入的行只属于新的 realm
    let stale = realm_count::Entity::find()
        .filter(realm_count::Column::RealmId.eq(first.realm_id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(stale, 0);
    assert_eq!(first.total_count_rows(), second.total_count_rows());
}

#[tokio::test]
async fn test_end_times_fall_within_day_window() {
    let (db, _dir) = create_temp_db().await;
    populate_default(&db).await;

    let options = test_options();
    let last_end_time = options.last_end_time();
    let window_start = last_end_time - Duration::days(DAYS as i64);

    let realm_times: Vec<DateTime<Utc>> = realm_count::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.end_time)
        .collect();
    let user_times: Vec<DateTime<Utc>> = user_count::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.end_time)
        .collect();
    let stream_times: Vec<DateTime<Utc>> = stream_count::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.end_time)
        .collect();
    assert!(!stream_times.is_empty());

    for end_time in realm_times
        .iter()
        .chain(user_times.iter())
        .chain(stream_times.iter())
    {
        assert!(*end_time > window_start, "{} before window", end_time);
        assert!(*end_time <= last_end_time, "{} after window", end_time);
    }

    // 日频率统计只落在零点
    let daily = realm_count::Entity::find()
        .filter(realm_count::Column::Property.eq("messages_sent:message_type:day"))
        .all(&db)
        .await
        .unwrap();
    assert!(!daily.is_empty());
    assert!(daily.iter().all(|r| r.end_time.timestamp() % 86_400 == 0));
}

#[tokio::test]
async fn test_client_subgroups_reference_clients_of_this_run() {
    let (db, _dir) = create_temp_db().await;
    populate_default(&db).await;
    let summary = populate_default(&db).await;

    let client_ids: HashSet<String> = summary.client_ids.iter().map(|id| id.to_string()).collect();
    assert_eq!(client_ids.len(), FIXTURE_CLIENT_NAMES.len());

    let realm_rows = realm_count::Entity::find()
        .filter(realm_count::Column::Property.eq("messages_sent:client:day"))
        .all(&db)
        .await
        .unwrap();
    let user_rows = user_count::Entity::find()
        .filter(user_count::Column::Property.eq("messages_sent:client:day"))
        .all(&db)
        .await
        .unwrap();

    assert!(!realm_rows.is_empty());
    assert!(!user_rows.is_empty());
    for subgroup in realm_rows
        .iter()
        .map(|r| &r.subgroup)
        .chain(user_rows.iter().map(|r| &r.subgroup))
    {
        let subgroup = subgroup.as_deref().unwrap();
        assert!(client_ids.contains(subgroup), "unknown client {}", subgroup);
    }
}

#[tokio::test]
async fn test_fill_state_marks_seeded_stats_done() {
    let (db, _dir) = create_temp_db().await;
    let summary = populate_default(&db).await;

    let states = fill_state::Entity::find()
        .order_by_asc(fill_state::Column::Property)
        .all(&db)
        .await
        .unwrap();

    assert_eq!(states.len() as u64, summary.fill_state_rows);
    assert_eq!(states.len(), 5);
    let last_end_time = test_options().last_end_time();
    for state in &states {
        assert_eq!(state.state, fill_state::DONE);
        assert_eq!(state.end_time, last_end_time);
    }
    assert!(states.iter().any(|s| s.property == "messages_in_stream:is_bot:day"));
}

#[tokio::test]
async fn test_same_seed_produces_same_rows() {
    let (db_a, _dir_a) = create_temp_db().await;
    let (db_b, _dir_b) = create_temp_db().await;
    populate_default(&db_a).await;
    populate_default(&db_b).await;

    async fn snapshot(db: &DatabaseConnection) -> Vec<(String, Option<String>, i64, i64)> {
        realm_count::Entity::find()
            .filter(realm_count::Column::Property.ne("messages_sent:client:day"))
            .order_by_asc(realm_count::Column::Property)
            .order_by_asc(realm_count::Column::Subgroup)
            .order_by_asc(realm_count::Column::EndTime)
            .all(db)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.property, r.subgroup, r.end_time.timestamp(), r.value))
            .collect()
    }

    assert_eq!(snapshot(&db_a).await, snapshot(&db_b).await);
}

#[tokio::test]
async fn test_drop_all_keeps_unrelated_clients() {
    let (db, _dir) = create_temp_db().await;

    client::ActiveModel {
        name: Set("website".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    populate_default(&db).await;
    let dropped = drop_all(&db, "analytics").await.unwrap();
    assert!(dropped > 0);

    assert_eq!(realm_count::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(user_count::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(stream_count::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(fill_state::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(realm::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(user_profile::Entity::find().count(&db).await.unwrap(), 0);

    let remaining: Vec<String> = client::Entity::find()
        .all(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(remaining, vec!["website".to_string()]);
}

#[tokio::test]
async fn test_failed_run_rolls_back() {
    let (db, _dir) = create_temp_db().await;
    let before = populate_default(&db).await;

    // 1 天的日频率序列只有 1 个点，生成器拒绝
    let options = PopulateOptions {
        days: 1,
        ..test_options()
    };
    let err = populate(&db, &options).await.unwrap_err();
    assert!(matches!(err, AnalyticsError::Validation(_)));

    let realm = realm::Entity::find()
        .filter(realm::Column::StringId.eq("analytics"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(realm.id, before.realm_id);
    assert_eq!(
        realm_count::Entity::find().count(&db).await.unwrap(),
        before.realm_count_rows
    );
}

#[tokio::test]
async fn test_empty_realm_string_id_rejected() {
    let (db, _dir) = create_temp_db().await;
    let options = PopulateOptions {
        realm_string_id: String::new(),
        ..test_options()
    };
    assert!(matches!(
        populate(&db, &options).await,
        Err(AnalyticsError::Validation(_))
    ));
}

#[tokio::test]
async fn test_oversized_day_count_rejected_before_teardown() {
    let (db, _dir) = create_temp_db().await;
    let before = populate_default(&db).await;

    for days in [MAX_DAYS_OF_DATA + 1, 100_000_000] {
        let options = PopulateOptions {
            days,
            ..test_options()
        };
        let err = populate(&db, &options).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::Validation(_)), "{:?}", err);
    }

    let realm = realm::Entity::find()
        .filter(realm::Column::StringId.eq("analytics"))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(realm.id, before.realm_id);
    assert_eq!(
        realm_count::Entity::find().count(&db).await.unwrap(),
        before.realm_count_rows
    );
    assert_eq!(
        stream_count::Entity::find().count(&db).await.unwrap(),
        before.stream_count_rows
    );
}
