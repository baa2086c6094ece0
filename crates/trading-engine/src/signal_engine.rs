//! Per-symbol evaluation.

use tracing::trace;
use trading_core::types::Signal;
use trading_data::{FeedMode, MarketDataFeed};
use trading_strategies::{MACrossoverDetector, PriceHistoryStore};

/// Fetches quotes and runs crossover detection over the price history.
///
/// The history itself is not owned here; callers lend it per evaluation.
#[derive(Debug)]
pub struct SignalEngine {
    feed: MarketDataFeed,
    detector: MACrossoverDetector,
}

impl SignalEngine {
    pub fn new(feed: MarketDataFeed, detector: MACrossoverDetector) -> Self {
        Self { feed, detector }
    }

    /// Window size the history store must be created with.
    pub fn window_size(&self) -> usize {
        self.detector.warmup_period()
    }

    pub fn feed_mode(&self) -> FeedMode {
        self.feed.mode()
    }

    pub fn feed_fallbacks(&self) -> u64 {
        self.feed.fallbacks()
    }

    /// Evaluate one symbol: fetch, append, detect.
    ///
    /// Returns at most one signal, and none until the window is full.
    pub async fn evaluate(
        &mut self,
        symbol: &str,
        history: &mut PriceHistoryStore,
    ) -> Option<Signal> {
        let quote = self.feed.fetch(symbol).await;
        trace!(symbol, last = quote.last, bid = quote.bid, ask = quote.ask, "Quote");

        history.append(symbol, quote.last);
        if history.len(symbol) < self.window_size() {
            return None;
        }

        self.detector.detect(symbol, &history.snapshot(symbol))
    }
}
