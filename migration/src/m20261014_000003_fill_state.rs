//! 统计填充进度表迁移
//!
//! fill_state 记录每个统计项已经聚合到的最后一个 end_time，
//! 图表接口只展示 end_time 之前的数据。

use sea_orm_migration::prelude::*;

use crate::PROPERTY_MAX_LEN;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FillState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FillState::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FillState::Property)
                            .string_len(PROPERTY_MAX_LEN)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(FillState::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FillState::State).small_integer().not_null())
                    .col(
                        ColumnDef::new(FillState::LastModified)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FillState::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FillState {
    #[sea_orm(iden = "fill_state")]
    Table,
    Id,
    Property,
    EndTime,
    State,
    LastModified,
}
