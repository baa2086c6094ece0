//! Quote cache trait definition.

use crate::error::DataError;
use crate::types::Quote;
use async_trait::async_trait;

/// Key-by-symbol read access to a low-latency quote cache.
#[async_trait]
pub trait QuoteCache: Send + Sync {
    /// Get the latest cached quote for a symbol.
    ///
    /// # Returns
    /// * `Ok(Some(quote))` on a hit
    /// * `Ok(None)` when the symbol has no cached value
    /// * `Err(_)` when the cache is unreachable or the payload is malformed
    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>, DataError>;

    /// Get the cache name.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapCache {
        quotes: HashMap<String, Quote>,
    }

    #[async_trait]
    impl QuoteCache for MapCache {
        async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>, DataError> {
            Ok(self.quotes.get(symbol).cloned())
        }

        fn name(&self) -> &str {
            "map"
        }
    }

    #[tokio::test]
    async fn test_cache_hit_and_miss() {
        let mut quotes = HashMap::new();
        quotes.insert("AAPL".to_string(), Quote::new("AAPL", 1.0, 1.2, 1.1, 10));
        let cache: Box<dyn QuoteCache> = Box::new(MapCache { quotes });

        assert!(cache.get_quote("AAPL").await.unwrap().is_some());
        assert!(cache.get_quote("TSLA").await.unwrap().is_none());
    }
}
