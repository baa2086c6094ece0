//! Trading signal types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
}

impl SignalType {
    /// Wire name ("BUY" / "SELL").
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directional trade hypothesis produced by one evaluation.
///
/// Signals are value objects: created by the engine, handed by value to the
/// publisher and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Symbol
    pub symbol: String,
    /// Direction
    pub signal_type: SignalType,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Reference price (latest last-trade price)
    pub price: f64,
    /// Suggested quantity
    pub quantity: u64,
    /// Human-readable reason
    pub reason: String,
    /// Fast moving average at generation time
    pub fast_ma: f64,
    /// Slow moving average at generation time
    pub slow_ma: f64,
    /// Generation time
    pub timestamp: DateTime<Utc>,
}

impl Signal {
    /// Build the payload published on the signal channel.
    pub fn payload(&self) -> SignalPayload {
        SignalPayload {
            symbol: self.symbol.clone(),
            signal: self.signal_type,
            confidence: self.confidence,
            price: self.price,
            quantity: self.quantity,
            reason: self.reason.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Wire payload expected by consumers of the `strategy-signals` channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPayload {
    pub symbol: String,
    pub signal: SignalType,
    pub confidence: f64,
    pub price: f64,
    pub quantity: u64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}
