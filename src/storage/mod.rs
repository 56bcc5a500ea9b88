//! 存储层
//!
//! 通过 SeaORM 连接 SQLite / MySQL / PostgreSQL，并在连接后执行迁移。

pub mod backend;

pub use backend::{
    connect, connect_generic, connect_sqlite, infer_backend_from_url, normalize_backend_name,
    run_migrations,
};
