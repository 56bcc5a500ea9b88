//! 租户实体表迁移
//!
//! 创建 analytics 计数表所依赖的实体表：
//! - realm: 组织（租户）
//! - user_profile: 用户，归属于一个 realm
//! - client: 消息来源客户端（website、API、移动端等）
//! - stream: 频道，归属于一个 realm

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. 创建 realm 表
        manager
            .create_table(
                Table::create()
                    .table(Realm::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Realm::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Realm::StringId)
                            .string_len(40)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Realm::Name).string_len(40).not_null())
                    .col(ColumnDef::new(Realm::Domain).string_len(40).not_null())
                    .col(
                        ColumnDef::new(Realm::DateCreated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. 创建 user_profile 表
        manager
            .create_table(
                Table::create()
                    .table(UserProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfile::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProfile::RealmId).integer().not_null())
                    .col(
                        ColumnDef::new(UserProfile::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfile::FullName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfile::ShortName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfile::IsStaff)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProfile::IsBot)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserProfile::ApiKey)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserProfile::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profile_realm")
                            .from(UserProfile::Table, UserProfile::RealmId)
                            .to(Realm::Table, Realm::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_profile_realm")
                    .table(UserProfile::Table)
                    .col(UserProfile::RealmId)
                    .to_owned(),
            )
            .await?;

        // 3. 创建 client 表（name 全局唯一）
        manager
            .create_table(
                Table::create()
                    .table(Client::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Client::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Client::Name)
                            .string_len(30)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. 创建 stream 表
        manager
            .create_table(
                Table::create()
                    .table(Stream::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stream::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Stream::RealmId).integer().not_null())
                    .col(ColumnDef::new(Stream::Name).string_len(60).not_null())
                    .col(
                        ColumnDef::new(Stream::DateCreated)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stream_realm")
                            .from(Stream::Table, Stream::RealmId)
                            .to(Realm::Table, Realm::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 唯一索引：realm_id + name
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_stream_realm_name")
                    .table(Stream::Table)
                    .col(Stream::RealmId)
                    .col(Stream::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_stream_realm_name")
                    .table(Stream::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Stream::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Client::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_user_profile_realm")
                    .table(UserProfile::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(UserProfile::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Realm::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Realm {
    #[sea_orm(iden = "realm")]
    Table,
    Id,
    StringId,
    Name,
    Domain,
    DateCreated,
}

#[derive(DeriveIden)]
pub(crate) enum UserProfile {
    #[sea_orm(iden = "user_profile")]
    Table,
    Id,
    RealmId,
    Email,
    FullName,
    ShortName,
    IsStaff,
    IsBot,
    ApiKey,
    DateJoined,
}

#[derive(DeriveIden)]
enum Client {
    #[sea_orm(iden = "client")]
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub(crate) enum Stream {
    #[sea_orm(iden = "stream")]
    Table,
    Id,
    RealmId,
    Name,
    DateCreated,
}
