//! Market data feed with explicit live/synthetic mode.

use std::fmt;
use tracing::{debug, warn};
use trading_core::traits::QuoteCache;
use trading_core::types::Quote;

use crate::synthetic::SyntheticQuotes;

/// Where quotes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    /// Backed by a quote cache, synthetic on miss or error
    Live,
    /// Cache unavailable, every quote is synthetic
    Synthetic,
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedMode::Live => f.write_str("live"),
            FeedMode::Synthetic => f.write_str("synthetic"),
        }
    }
}

enum Backend {
    Live(Box<dyn QuoteCache>),
    Synthetic,
}

/// Read-only accessor for the latest quote of a symbol.
pub struct MarketDataFeed {
    backend: Backend,
    synthetic: SyntheticQuotes,
    fallbacks: u64,
}

impl MarketDataFeed {
    /// Create a feed backed by a quote cache.
    pub fn live(cache: Box<dyn QuoteCache>, synthetic: SyntheticQuotes) -> Self {
        Self {
            backend: Backend::Live(cache),
            synthetic,
            fallbacks: 0,
        }
    }

    /// Create a feed that only produces synthetic quotes.
    pub fn synthetic(synthetic: SyntheticQuotes) -> Self {
        Self {
            backend: Backend::Synthetic,
            synthetic,
            fallbacks: 0,
        }
    }

    pub fn mode(&self) -> FeedMode {
        match self.backend {
            Backend::Live(_) => FeedMode::Live,
            Backend::Synthetic => FeedMode::Synthetic,
        }
    }

    /// Number of live reads answered with a synthetic quote.
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    /// Fetch the latest quote. Never fails.
    ///
    /// A cache miss, an unreachable cache or a malformed payload all yield a
    /// synthetic quote; the read itself is not bounded by a timeout.
    pub async fn fetch(&mut self, symbol: &str) -> Quote {
        if let Backend::Live(cache) = &self.backend {
            match cache.get_quote(symbol).await {
                Ok(Some(quote)) => return quote,
                Ok(None) => {
                    debug!(symbol, "Cache miss, using synthetic quote");
                }
                Err(e) => {
                    warn!(symbol, cache = cache.name(), error = %e, "Cache read failed, using synthetic quote");
                }
            }
            self.fallbacks += 1;
        }

        self.synthetic.next_quote(symbol)
    }
}

impl fmt::Debug for MarketDataFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketDataFeed")
            .field("mode", &self.mode())
            .field("fallbacks", &self.fallbacks)
            .finish()
    }
}
