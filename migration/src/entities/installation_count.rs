//! 全局计数行（不归属任何 realm）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "installation_count")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub property: String,
    pub subgroup: Option<String>,
    pub end_time: DateTimeUtc,
    pub value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
