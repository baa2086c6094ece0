//! Test doubles shared by the engine and scheduler tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use trading_core::error::DataError;
use trading_core::traits::QuoteCache;
use trading_core::types::Quote;

#[derive(Default)]
struct ScriptedState {
    prices: HashMap<String, VecDeque<f64>>,
    requests: Vec<String>,
    delay: Option<Duration>,
}

/// Cache replaying a scripted price sequence per symbol.
///
/// Exhausted or unscripted symbols are cache misses. Every request is logged
/// once it completes. An optional delay is slept before each answer.
#[derive(Clone, Default)]
pub struct ScriptedCache {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, symbol: &str, prices: impl IntoIterator<Item = f64>) {
        self.state
            .lock()
            .unwrap()
            .prices
            .entry(symbol.to_string())
            .or_default()
            .extend(prices);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    /// Symbols requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl QuoteCache for ScriptedCache {
    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>, DataError> {
        let delay = self.state.lock().unwrap().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        state.requests.push(symbol.to_string());
        let next = state.prices.get_mut(symbol).and_then(VecDeque::pop_front);
        Ok(next.map(|last| Quote::new(symbol, last - 0.05, last + 0.05, last, 1_000)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
