//! Synthetic quote generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use trading_core::types::Quote;

/// Parameters of the synthetic quote distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Center of the last-trade price
    pub base_price: f64,
    /// Maximum absolute deviation of the last-trade price from the base
    pub jitter: f64,
    /// Bid/ask spread around the last-trade price
    pub spread: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            base_price: 150.05,
            jitter: 1.0,
            spread: 0.10,
        }
    }
}

/// Random quotes around a base price.
///
/// Seeded generators produce the same sequence on every run.
#[derive(Debug, Clone)]
pub struct SyntheticQuotes {
    config: SyntheticConfig,
    rng: StdRng,
}

impl SyntheticQuotes {
    /// Create a generator; `seed` makes the sequence reproducible.
    pub fn new(config: SyntheticConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Generate the next quote for a symbol.
    pub fn next_quote(&mut self, symbol: &str) -> Quote {
        let jitter = self.config.jitter.abs();
        let last = self.config.base_price + self.rng.gen_range(-jitter..=jitter);
        let half_spread = self.config.spread / 2.0;
        let volume = self.rng.gen_range(1_000..10_000);

        Quote::new(symbol, last - half_spread, last + half_spread, last, volume)
    }
}

impl Default for SyntheticQuotes {
    fn default() -> Self {
        Self::new(SyntheticConfig::default(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotes_stay_within_bounds() {
        let mut generator = SyntheticQuotes::new(SyntheticConfig::default(), Some(7));

        for _ in 0..1000 {
            let quote = generator.next_quote("AAPL");
            assert_eq!(quote.symbol, "AAPL");
            assert!((quote.last - 150.05).abs() <= 1.0 + 1e-9);
            assert!(quote.bid < quote.last && quote.last < quote.ask);
            assert!((quote.spread() - 0.10).abs() < 1e-9);
            assert!((1_000..10_000).contains(&quote.volume));
        }
    }

    #[test]
    fn test_seeded_generators_repeat() {
        let mut a = SyntheticQuotes::new(SyntheticConfig::default(), Some(42));
        let mut b = SyntheticQuotes::new(SyntheticConfig::default(), Some(42));

        for _ in 0..10 {
            assert_eq!(a.next_quote("MSFT"), b.next_quote("MSFT"));
        }
    }

    #[test]
    fn test_zero_jitter_is_constant() {
        let config = SyntheticConfig {
            base_price: 100.0,
            jitter: 0.0,
            spread: 0.2,
        };
        let mut generator = SyntheticQuotes::new(config, Some(1));

        let quote = generator.next_quote("TSLA");
        assert!((quote.last - 100.0).abs() < 1e-12);
        assert!((quote.bid - 99.9).abs() < 1e-9);
    }
}
