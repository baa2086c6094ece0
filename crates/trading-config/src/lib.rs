//! Configuration management.
//!
//! Settings come from a TOML file layered with `SIGNALS__`-prefixed
//! environment variables, e.g. `SIGNALS__SCHEDULER__INTERVAL_SECS=10` or
//! `SIGNALS__SCHEDULER__SYMBOLS=AAPL,MSFT`.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BusKind, BusSettings, CacheSettings, FeedSettings, LoggingConfig,
    SchedulerSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("SIGNALS")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("scheduler.symbols")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
