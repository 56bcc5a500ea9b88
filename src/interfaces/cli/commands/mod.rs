//! CLI command implementations

mod config_gen;
mod drop;
mod populate;

pub use config_gen::config_generate;
pub use drop::drop_analytics;
pub use populate::run_populate;
