//! 测试租户实体的创建与清理

use chrono::{DateTime, Utc};
use rand::RngExt;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, info};

use crate::errors::Result;
use migration::entities::{
    client, realm, realm_count, stream, stream_count, user_count, user_profile,
};

pub const REALM_NAME: &str = "Analytics";
pub const REALM_DOMAIN: &str = "analytics.ds";
pub const USER_FULL_NAME: &str = "Shylock";
pub const USER_SHORT_NAME: &str = "shylock";
pub const STREAM_NAME: &str = "all";

/// 测试客户端名称，统一以 `_` 结尾，便于下次运行时识别并删除
pub const FIXTURE_CLIENT_NAMES: [&str; 8] = [
    "website_",
    "API_",
    "android_",
    "iOS_",
    "react_native_",
    "electron_",
    "barnowl_",
    "plan9_",
];

/// 测试用户邮箱
pub fn fixture_user_email() -> String {
    format!("{}@{}", USER_SHORT_NAME, REALM_DOMAIN)
}

/// 是否为测试客户端
pub fn is_fixture_client_name(name: &str) -> bool {
    name.ends_with('_')
}

/// 32 位十六进制 API key
fn generate_api_key() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// 删除上一次运行留下的测试 realm（连同其用户、频道、计数行）和测试客户端
///
/// 返回删除的 realm 数和客户端数。
pub async fn drop_fixture_entities<C: ConnectionTrait>(
    db: &C,
    realm_string_id: &str,
) -> Result<(u64, u64)> {
    let realms = realm::Entity::find()
        .filter(realm::Column::StringId.eq(realm_string_id))
        .all(db)
        .await?;
    let realm_ids: Vec<i32> = realms.iter().map(|r| r.id).collect();

    let mut deleted_realms = 0;
    if !realm_ids.is_empty() {
        // 不依赖数据库的级联删除（SQLite 可能未开启外键约束）
        user_count::Entity::delete_many()
            .filter(user_count::Column::RealmId.is_in(realm_ids.clone()))
            .exec(db)
            .await?;
        stream_count::Entity::delete_many()
            .filter(stream_count::Column::RealmId.is_in(realm_ids.clone()))
            .exec(db)
            .await?;
        realm_count::Entity::delete_many()
            .filter(realm_count::Column::RealmId.is_in(realm_ids.clone()))
            .exec(db)
            .await?;
        stream::Entity::delete_many()
            .filter(stream::Column::RealmId.is_in(realm_ids.clone()))
            .exec(db)
            .await?;
        user_profile::Entity::delete_many()
            .filter(user_profile::Column::RealmId.is_in(realm_ids.clone()))
            .exec(db)
            .await?;
        deleted_realms = realm::Entity::delete_many()
            .filter(realm::Column::Id.is_in(realm_ids))
            .exec(db)
            .await?
            .rows_affected;
    }

    // LIKE 中 `_` 是通配符，这里在内存中按后缀过滤
    let client_ids: Vec<i32> = client::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .filter(|c| is_fixture_client_name(&c.name))
        .map(|c| c.id)
        .collect();

    let mut deleted_clients = 0;
    if !client_ids.is_empty() {
        deleted_clients = client::Entity::delete_many()
            .filter(client::Column::Id.is_in(client_ids))
            .exec(db)
            .await?
            .rows_affected;
    }

    info!(
        "Dropped {} fixture realm(s) and {} fixture client(s)",
        deleted_realms, deleted_clients
    );
    Ok((deleted_realms, deleted_clients))
}

pub async fn create_realm<C: ConnectionTrait>(
    db: &C,
    string_id: &str,
    date_created: DateTime<Utc>,
) -> Result<realm::Model> {
    let model = realm::ActiveModel {
        string_id: Set(string_id.to_string()),
        name: Set(REALM_NAME.to_string()),
        domain: Set(REALM_DOMAIN.to_string()),
        date_created: Set(date_created),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!("Created realm '{}' (id={})", model.string_id, model.id);
    Ok(model)
}

pub async fn create_user<C: ConnectionTrait>(
    db: &C,
    realm: &realm::Model,
    date_joined: DateTime<Utc>,
) -> Result<user_profile::Model> {
    let model = user_profile::ActiveModel {
        realm_id: Set(realm.id),
        email: Set(fixture_user_email()),
        full_name: Set(USER_FULL_NAME.to_string()),
        short_name: Set(USER_SHORT_NAME.to_string()),
        is_staff: Set(true),
        is_bot: Set(false),
        api_key: Set(generate_api_key()),
        date_joined: Set(date_joined),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!("Created user '{}' (id={})", model.email, model.id);
    Ok(model)
}

pub async fn create_stream<C: ConnectionTrait>(
    db: &C,
    realm: &realm::Model,
    date_created: DateTime<Utc>,
) -> Result<stream::Model> {
    let model = stream::ActiveModel {
        realm_id: Set(realm.id),
        name: Set(STREAM_NAME.to_string()),
        date_created: Set(date_created),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!("Created stream '{}' (id={})", model.name, model.id);
    Ok(model)
}

/// 按 `FIXTURE_CLIENT_NAMES` 的顺序创建客户端
pub async fn create_clients<C: ConnectionTrait>(db: &C) -> Result<Vec<client::Model>> {
    let mut clients = Vec::with_capacity(FIXTURE_CLIENT_NAMES.len());
    for name in FIXTURE_CLIENT_NAMES {
        let model = client::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        clients.push(model);
    }

    debug!("Created {} fixture clients", clients.len());
    Ok(clients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_client_names_are_recognizable() {
        assert!(FIXTURE_CLIENT_NAMES.iter().all(|n| is_fixture_client_name(n)));
        assert!(!is_fixture_client_name("website"));
        assert!(!is_fixture_client_name("_internal"));
    }

    #[test]
    fn test_api_key_shape() {
        let key = generate_api_key();
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(key, generate_api_key());
    }

    #[test]
    fn test_user_email() {
        assert_eq!(fixture_user_email(), "shylock@analytics.ds");
    }
}
