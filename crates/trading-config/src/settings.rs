//! Configuration structures.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use trading_core::error::TradingError;
use trading_data::SyntheticConfig;
use trading_strategies::MACrossoverConfig;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub strategy: MACrossoverConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub bus: BusSettings,
    #[serde(default)]
    pub feed: FeedSettings,
}

impl AppConfig {
    /// Check cross-field constraints. Invalid configuration is the only
    /// startup error that stops the process.
    pub fn validate(&self) -> Result<(), TradingError> {
        if self.scheduler.symbols.is_empty() {
            return Err(TradingError::Config("At least one symbol required".into()));
        }
        let mut seen = HashSet::new();
        for symbol in &self.scheduler.symbols {
            if symbol.trim().is_empty() {
                return Err(TradingError::Config("Symbols must not be empty".into()));
            }
            if !seen.insert(symbol.as_str()) {
                return Err(TradingError::Config(format!("Duplicate symbol: {}", symbol)));
            }
        }
        if self.scheduler.interval_secs == 0 {
            return Err(TradingError::Config(
                "Interval must be at least one second".into(),
            ));
        }
        if self.bus.topic.is_empty() {
            return Err(TradingError::Config("Bus topic must not be empty".into()));
        }
        if self.bus.enabled && self.bus.brokers().is_empty() {
            return Err(TradingError::Config("Bus endpoint must not be empty".into()));
        }
        if self.bus.partition < 0 {
            return Err(TradingError::Config("Bus partition must not be negative".into()));
        }
        self.feed.validate()?;
        self.strategy.validate()?;
        Ok(())
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "signal-generator".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Evaluation loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Seconds between passes
    pub interval_secs: u64,
    /// Symbols evaluated each pass, in order
    pub symbols: Vec<String>,
    /// Stop after this many passes (unbounded when unset)
    pub max_ticks: Option<u64>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            symbols: ["AAPL", "GOOGL", "MSFT", "AMZN", "TSLA"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_ticks: None,
        }
    }
}

/// Quote cache connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub url: String,
    pub connect_timeout_ms: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "redis://localhost:6380".to_string(),
            connect_timeout_ms: 2000,
        }
    }
}

/// Wire protocol of the message bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusKind {
    /// Kafka producer
    Kafka,
    /// Newline-delimited JSON over a raw TCP socket
    Tcp,
}

/// Message bus connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusSettings {
    pub enabled: bool,
    pub kind: BusKind,
    /// Comma-separated Kafka bootstrap brokers, or `host:port` for TCP
    pub endpoint: String,
    pub topic: String,
    /// Kafka partition signals are produced to
    pub partition: i32,
    pub connect_timeout_ms: u64,
}

impl BusSettings {
    /// Endpoint split into its broker addresses.
    pub fn brokers(&self) -> Vec<String> {
        self.endpoint
            .split(',')
            .map(str::trim)
            .filter(|broker| !broker.is_empty())
            .map(String::from)
            .collect()
    }
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: BusKind::Kafka,
            endpoint: "localhost:9092".to_string(),
            topic: "strategy-signals".to_string(),
            partition: 0,
            connect_timeout_ms: 2000,
        }
    }
}

/// Synthetic quote settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub base_price: f64,
    pub jitter: f64,
    pub spread: f64,
    /// Fixed seed for reproducible synthetic quotes
    pub synthetic_seed: Option<u64>,
}

impl FeedSettings {
    /// Reject values the synthetic generator cannot sample from.
    pub fn validate(&self) -> Result<(), TradingError> {
        let finite = [self.base_price, self.jitter, self.spread]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(TradingError::Config(
                "Feed prices must be finite numbers".into(),
            ));
        }
        if self.base_price <= 0.0 {
            return Err(TradingError::Config(
                "Feed base price must be positive".into(),
            ));
        }
        if self.jitter < 0.0 || self.spread < 0.0 {
            return Err(TradingError::Config(
                "Feed jitter and spread must not be negative".into(),
            ));
        }
        Ok(())
    }

    pub fn synthetic_config(&self) -> SyntheticConfig {
        SyntheticConfig {
            base_price: self.base_price,
            jitter: self.jitter,
            spread: self.spread,
        }
    }
}

impl Default for FeedSettings {
    fn default() -> Self {
        let synthetic = SyntheticConfig::default();
        Self {
            base_price: synthetic.base_price,
            jitter: synthetic.jitter,
            spread: synthetic.spread,
            synthetic_seed: None,
        }
    }
}
