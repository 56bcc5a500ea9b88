//! 统计填充进度实体

use sea_orm::entity::prelude::*;

/// 已完成填充
pub const DONE: i16 = 1;
/// 填充进行中
pub const STARTED: i16 = 0;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "fill_state")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub property: String,
    pub end_time: DateTimeUtc,
    pub state: i16,
    pub last_modified: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
