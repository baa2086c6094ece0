//! Startup wiring for the two external collaborators.
//!
//! Neither connection failure aborts startup: the feed falls back to
//! synthetic quotes and the publisher to its disconnected mode.

use std::time::Duration;
use tracing::{info, warn};
use trading_config::{BusKind, BusSettings, CacheSettings, FeedSettings};
use trading_core::error::PublishError;
use trading_core::traits::MessageBus;
use trading_data::{MarketDataFeed, RedisQuoteCache, SyntheticQuotes};
use trading_publisher::{KafkaMessageBus, SignalPublisher, TcpMessageBus};

/// Build the market data feed, connecting to the quote cache when enabled.
pub async fn connect_feed(cache: &CacheSettings, feed: &FeedSettings) -> MarketDataFeed {
    let synthetic = SyntheticQuotes::new(feed.synthetic_config(), feed.synthetic_seed);

    if !cache.enabled {
        info!("Quote cache disabled, using synthetic quotes");
        return MarketDataFeed::synthetic(synthetic);
    }

    let timeout = Duration::from_millis(cache.connect_timeout_ms);
    match RedisQuoteCache::connect(&cache.url, timeout).await {
        Ok(redis) => MarketDataFeed::live(Box::new(redis), synthetic),
        Err(e) => {
            warn!(url = %cache.url, error = %e, "Quote cache unavailable, using synthetic quotes");
            MarketDataFeed::synthetic(synthetic)
        }
    }
}

/// Build the signal publisher, connecting to the message bus when enabled.
pub async fn connect_publisher(bus: &BusSettings) -> SignalPublisher {
    if !bus.enabled {
        info!("Message bus disabled, signals will not be published");
        return SignalPublisher::disconnected(bus.topic.clone());
    }

    match connect_bus(bus).await {
        Ok(connected) => SignalPublisher::new(connected, bus.topic.clone()),
        Err(e) => {
            warn!(endpoint = %bus.endpoint, error = %e, "Message bus unavailable, signals will be dropped");
            SignalPublisher::disconnected(bus.topic.clone())
        }
    }
}

async fn connect_bus(bus: &BusSettings) -> Result<Box<dyn MessageBus>, PublishError> {
    let timeout = Duration::from_millis(bus.connect_timeout_ms);
    match bus.kind {
        BusKind::Kafka => {
            let kafka =
                KafkaMessageBus::connect(bus.brokers(), &bus.topic, bus.partition, timeout).await?;
            Ok(Box::new(kafka))
        }
        BusKind::Tcp => {
            let tcp = TcpMessageBus::connect(&bus.endpoint, timeout).await?;
            Ok(Box::new(tcp))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use trading_data::FeedMode;

    async fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);
        addr
    }

    #[tokio::test]
    async fn test_disabled_cache_is_synthetic() {
        let cache = CacheSettings {
            enabled: false,
            ..Default::default()
        };
        let feed = connect_feed(&cache, &FeedSettings::default()).await;
        assert_eq!(feed.mode(), FeedMode::Synthetic);
    }

    #[tokio::test]
    async fn test_unreachable_cache_is_synthetic() {
        let cache = CacheSettings {
            enabled: true,
            url: format!("redis://{}/", closed_port().await),
            connect_timeout_ms: 500,
        };
        let feed = connect_feed(&cache, &FeedSettings::default()).await;
        assert_eq!(feed.mode(), FeedMode::Synthetic);
    }

    #[tokio::test]
    async fn test_unreachable_bus_is_disconnected() {
        let bus = BusSettings {
            endpoint: closed_port().await,
            connect_timeout_ms: 500,
            ..Default::default()
        };
        let publisher = connect_publisher(&bus).await;
        assert!(!publisher.is_connected());
        assert_eq!(publisher.topic(), "strategy-signals");
    }

    #[tokio::test]
    async fn test_unreachable_tcp_bus_is_disconnected() {
        let bus = BusSettings {
            kind: BusKind::Tcp,
            endpoint: closed_port().await,
            connect_timeout_ms: 500,
            ..Default::default()
        };
        assert!(!connect_publisher(&bus).await.is_connected());
    }

    #[tokio::test]
    async fn test_reachable_tcp_bus_is_connected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let bus = BusSettings {
            kind: BusKind::Tcp,
            endpoint: listener.local_addr().unwrap().to_string(),
            ..Default::default()
        };
        let mut publisher = connect_publisher(&bus).await;
        assert!(publisher.is_connected());
        publisher.close().await;
    }
}
