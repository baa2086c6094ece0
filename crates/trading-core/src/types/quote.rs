//! Quote snapshot.

use serde::{Deserialize, Serialize};

/// Latest quote/trade snapshot for a symbol.
///
/// This is also the JSON record stored in the market data cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol. Cache writers sometimes omit it; readers fill it in.
    #[serde(default)]
    pub symbol: String,
    /// Best bid price
    pub bid: f64,
    /// Best ask price
    pub ask: f64,
    /// Last trade price
    pub last: f64,
    /// Traded volume
    #[serde(default)]
    pub volume: u64,
}

impl Quote {
    /// Create a new quote.
    pub fn new(symbol: impl Into<String>, bid: f64, ask: f64, last: f64, volume: u64) -> Self {
        Self {
            symbol: symbol.into(),
            bid,
            ask,
            last,
            volume,
        }
    }

    /// Get the mid price.
    pub fn mid(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Get the spread.
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Decode a cached JSON record, filling in the symbol when it is missing.
    pub fn from_json(symbol: &str, raw: &str) -> Result<Self, serde_json::Error> {
        let mut quote: Quote = serde_json::from_str(raw)?;
        if quote.symbol.is_empty() {
            quote.symbol = symbol.to_string();
        }
        Ok(quote)
    }
}
