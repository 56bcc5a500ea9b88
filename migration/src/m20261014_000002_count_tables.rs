//! 计数事实表迁移
//!
//! 所有计数表共享 (property, subgroup, end_time, value) 四列，区别只在归属：
//! - installation_count: 全局
//! - realm_count: 按 realm
//! - user_count: 按 user（同时冗余 realm_id）
//! - stream_count: 按 stream（同时冗余 realm_id）
//!
//! 每张表对 (owner, property, subgroup, end_time) 建唯一索引。

use sea_orm_migration::prelude::*;

use crate::PROPERTY_MAX_LEN;
use crate::m20261014_000001_fixture_entities::{Realm, Stream, UserProfile};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 追加计数表的公共列
fn add_count_columns(table: &mut TableCreateStatement) -> &mut TableCreateStatement {
    table
        .col(
            ColumnDef::new(Count::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Count::Property)
                .string_len(PROPERTY_MAX_LEN)
                .not_null(),
        )
        .col(ColumnDef::new(Count::Subgroup).string_len(16).null())
        .col(
            ColumnDef::new(Count::EndTime)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(
            ColumnDef::new(Count::Value)
                .big_integer()
                .not_null()
                .default(0),
        )
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. installation_count
        let mut table = Table::create();
        table.table(Count::InstallationCount).if_not_exists();
        add_count_columns(&mut table);
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_installation_count_unique")
                    .table(Count::InstallationCount)
                    .col(Count::Property)
                    .col(Count::Subgroup)
                    .col(Count::EndTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 2. realm_count
        let mut table = Table::create();
        table.table(Count::RealmCount).if_not_exists();
        add_count_columns(&mut table)
            .col(ColumnDef::new(Count::RealmId).integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_realm_count_realm")
                    .from(Count::RealmCount, Count::RealmId)
                    .to(Realm::Table, Realm::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_realm_count_unique")
                    .table(Count::RealmCount)
                    .col(Count::RealmId)
                    .col(Count::Property)
                    .col(Count::Subgroup)
                    .col(Count::EndTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 按 property + end_time 查询（图表接口）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_realm_count_property_end_time")
                    .table(Count::RealmCount)
                    .col(Count::Property)
                    .col(Count::EndTime)
                    .to_owned(),
            )
            .await?;

        // 3. user_count
        let mut table = Table::create();
        table.table(Count::UserCount).if_not_exists();
        add_count_columns(&mut table)
            .col(ColumnDef::new(Count::RealmId).integer().not_null())
            .col(ColumnDef::new(Count::UserId).integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_user_count_realm")
                    .from(Count::UserCount, Count::RealmId)
                    .to(Realm::Table, Realm::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_user_count_user")
                    .from(Count::UserCount, Count::UserId)
                    .to(UserProfile::Table, UserProfile::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_count_unique")
                    .table(Count::UserCount)
                    .col(Count::UserId)
                    .col(Count::Property)
                    .col(Count::Subgroup)
                    .col(Count::EndTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 4. stream_count
        let mut table = Table::create();
        table.table(Count::StreamCount).if_not_exists();
        add_count_columns(&mut table)
            .col(ColumnDef::new(Count::RealmId).integer().not_null())
            .col(ColumnDef::new(Count::StreamId).integer().not_null())
            .foreign_key(
                ForeignKey::create()
                    .name("fk_stream_count_realm")
                    .from(Count::StreamCount, Count::RealmId)
                    .to(Realm::Table, Realm::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_stream_count_stream")
                    .from(Count::StreamCount, Count::StreamId)
                    .to(Stream::Table, Stream::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        manager.create_table(table).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stream_count_unique")
                    .table(Count::StreamCount)
                    .col(Count::StreamId)
                    .col(Count::Property)
                    .col(Count::Subgroup)
                    .col(Count::EndTime)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (index, table) in [
            ("idx_stream_count_unique", Count::StreamCount),
            ("idx_user_count_unique", Count::UserCount),
            ("idx_realm_count_property_end_time", Count::RealmCount),
            ("idx_realm_count_unique", Count::RealmCount),
            ("idx_installation_count_unique", Count::InstallationCount),
        ] {
            manager
                .drop_index(Index::drop().name(index).table(table).to_owned())
                .await?;
        }

        for table in [
            Count::StreamCount,
            Count::UserCount,
            Count::RealmCount,
            Count::InstallationCount,
        ] {
            manager
                .drop_table(Table::drop().table(table).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
enum Count {
    #[sea_orm(iden = "installation_count")]
    InstallationCount,
    #[sea_orm(iden = "realm_count")]
    RealmCount,
    #[sea_orm(iden = "user_count")]
    UserCount,
    #[sea_orm(iden = "stream_count")]
    StreamCount,
    Id,
    Property,
    Subgroup,
    EndTime,
    Value,
    RealmId,
    UserId,
    StreamId,
}
