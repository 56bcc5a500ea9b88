//! Analytics populator - seeds the analytics tables with synthetic demo data
//!
//! # Architecture
//! - `analytics`: Statistics registry, time bucketing and the synthetic series generator
//! - `populate`: Fixture entities and the populate run itself
//! - `storage`: Database connection, migrations and retry helpers
//! - `interfaces`: Command-line interface
//! - `config`: Configuration management
//! - `system`: Logging initialization

pub mod analytics;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod populate;
pub mod storage;
pub mod system;
