//! Market data feed.
//!
//! The feed never fails: quotes come from the Redis cache when it is
//! reachable and holds the symbol, and from the synthetic generator otherwise.

mod feed;
mod redis_cache;
mod synthetic;

pub use feed::{FeedMode, MarketDataFeed};
pub use redis_cache::{RedisQuoteCache, KEY_PREFIX};
pub use synthetic::{SyntheticConfig, SyntheticQuotes};
