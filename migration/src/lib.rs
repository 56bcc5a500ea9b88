pub use sea_orm_migration::prelude::*;

pub mod entities;

/// 计数表和 fill_state 中 property 列的最大长度
pub const PROPERTY_MAX_LEN: u32 = 40;

mod m20261014_000001_fixture_entities;
mod m20261014_000002_count_tables;
mod m20261014_000003_fill_state;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261014_000001_fixture_entities::Migration),
            Box::new(m20261014_000002_count_tables::Migration),
            Box::new(m20261014_000003_fill_state::Migration),
        ]
    }
}
