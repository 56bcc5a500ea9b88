use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::{DEFAULT_CONFIG_PATH, StaticConfig};
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Falls back to loading `config.toml` from the current directory if
/// nothing has been initialized yet.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::load()))
        .load_full()
}

/// Load configuration from `path` (default "config.toml") plus environment
/// overrides and install it as the global configuration
///
/// A malformed file or environment value is returned as an error; nothing is
/// installed in that case.
///
/// # Examples
/// ```no_run
/// use analytics_populator::config::init_config_from;
/// init_config_from(Some("populate.toml")).unwrap();
/// ```
pub fn init_config_from(path: Option<&str>) -> Result<Arc<StaticConfig>> {
    let config = StaticConfig::try_load_from(path.unwrap_or(DEFAULT_CONFIG_PATH))?;
    update_config(config);
    Ok(get_config())
}

/// Replace the global configuration
///
/// Used to apply command-line overrides (e.g. `--database-url`) after loading.
pub fn update_config(config: StaticConfig) {
    match CONFIG.get() {
        Some(current) => current.store(Arc::new(config)),
        None => {
            let _ = CONFIG.set(ArcSwap::from_pointee(config));
        }
    }
}
