//! Moving Average Crossover detection.
//!
//! Emits a buy signal while the fast SMA sits above the slow SMA by more than
//! the hysteresis band, and a sell signal while it sits below by more than the
//! band. Inside the band nothing is emitted.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use trading_core::{
    error::StrategyError,
    types::{Signal, SignalType},
};
use trading_indicators::Sma;

use crate::price_window::DEFAULT_WINDOW_SIZE;

/// Confidence attached to every crossover signal.
pub const SIGNAL_CONFIDENCE: f64 = 0.7;

/// Suggested quantity attached to every crossover signal.
pub const SIGNAL_QUANTITY: u64 = 100;

/// Configuration for crossover detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MACrossoverConfig {
    /// Slow moving average period, also the price window size
    pub window_size: usize,
    /// Fast moving average period
    pub fast_period: usize,
    /// Hysteresis band around equality (fraction, 0.001 = 0.1%)
    pub band: f64,
}

impl Default for MACrossoverConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            fast_period: 10,
            band: 0.001, // 0.1%
        }
    }
}

impl MACrossoverConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), StrategyError> {
        if self.fast_period == 0 {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be greater than 0".into(),
            ));
        }
        if self.fast_period >= self.window_size {
            return Err(StrategyError::InvalidConfig(
                "Fast period must be less than window size".into(),
            ));
        }
        if !(0.0..1.0).contains(&self.band) {
            return Err(StrategyError::InvalidConfig(
                "Band must be in [0, 1)".into(),
            ));
        }
        Ok(())
    }
}

/// Dual moving-average crossover detector.
///
/// Stateless across calls: every decision is made from the window snapshot
/// it is given.
#[derive(Debug, Clone)]
pub struct MACrossoverDetector {
    config: MACrossoverConfig,
    fast: Sma,
    slow: Sma,
}

impl MACrossoverDetector {
    /// Create a detector, validating the configuration first.
    pub fn new(config: MACrossoverConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            fast: Sma::new(config.fast_period),
            slow: Sma::new(config.window_size),
            config,
        })
    }

    pub fn config(&self) -> &MACrossoverConfig {
        &self.config
    }

    /// Number of prices required before a signal can be produced.
    pub fn warmup_period(&self) -> usize {
        self.config.window_size
    }

    /// Detect a crossover over a window snapshot (oldest first).
    ///
    /// Returns `None` while the snapshot holds fewer than `window_size`
    /// prices or while the averages are inside the band. The signal price is
    /// the newest price of the snapshot.
    pub fn detect(&self, symbol: &str, prices: &[f64]) -> Option<Signal> {
        if prices.len() < self.warmup_period() {
            return None;
        }

        let fast_ma = self.fast.latest(prices)?;
        let slow_ma = self.slow.latest(prices)?;
        let price = *prices.last()?;

        let (signal_type, relation) = if fast_ma > slow_ma * (1.0 + self.config.band) {
            (SignalType::Buy, "above")
        } else if fast_ma < slow_ma * (1.0 - self.config.band) {
            (SignalType::Sell, "below")
        } else {
            debug!(symbol, fast_ma, slow_ma, "Averages inside band");
            return None;
        };

        Some(Signal {
            symbol: symbol.to_string(),
            signal_type,
            confidence: SIGNAL_CONFIDENCE,
            price,
            quantity: SIGNAL_QUANTITY,
            reason: format!(
                "Fast MA ({:.2}) crossed {} Slow MA ({:.2})",
                fast_ma, relation, slow_ma
            ),
            fast_ma,
            slow_ma,
            timestamp: Utc::now(),
        })
    }
}
