//! Signal publisher with degraded mode.

use std::fmt;
use tracing::{error, info, warn};
use trading_core::error::PublishError;
use trading_core::traits::{BusRecord, MessageBus};
use trading_core::types::Signal;

/// Channel consumers listen on.
pub const DEFAULT_TOPIC: &str = "strategy-signals";

/// Result of a publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Sent and flushed
    Delivered,
    /// Not delivered; the signal is dropped
    Degraded,
}

/// Delivers signals to the message bus.
///
/// Without a bus every publish is a logged no-op. Failed deliveries are
/// neither retried nor buffered.
pub struct SignalPublisher {
    bus: Option<Box<dyn MessageBus>>,
    topic: String,
}

impl SignalPublisher {
    /// Create a publisher over a connected bus.
    pub fn new(bus: Box<dyn MessageBus>, topic: impl Into<String>) -> Self {
        Self {
            bus: Some(bus),
            topic: topic.into(),
        }
    }

    /// Create a publisher whose bus could not be reached.
    pub fn disconnected(topic: impl Into<String>) -> Self {
        Self {
            bus: None,
            topic: topic.into(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.bus.is_some()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Publish a signal, consuming it.
    pub async fn publish(&mut self, signal: Signal) -> PublishOutcome {
        let Some(bus) = self.bus.as_mut() else {
            warn!(
                symbol = %signal.symbol,
                signal = %signal.signal_type,
                price = signal.price,
                reason = %signal.reason,
                "Cannot publish signal (message bus not connected)"
            );
            return PublishOutcome::Degraded;
        };

        match deliver(&mut **bus, &self.topic, &signal).await {
            Ok(()) => {
                info!(
                    "Signal published: {} {} @ ${:.2}",
                    signal.signal_type, signal.symbol, signal.price
                );
                PublishOutcome::Delivered
            }
            Err(e) => {
                error!(symbol = %signal.symbol, bus = bus.name(), error = %e, "Failed to publish signal");
                PublishOutcome::Degraded
            }
        }
    }

    /// Flush and release the bus connection. Safe to call more than once.
    pub async fn close(&mut self) {
        if let Some(mut bus) = self.bus.take() {
            match bus.close().await {
                Ok(()) => info!(bus = bus.name(), "Message bus connection closed"),
                Err(e) => warn!(bus = bus.name(), error = %e, "Error closing message bus"),
            }
        }
    }
}

async fn deliver(
    bus: &mut dyn MessageBus,
    topic: &str,
    signal: &Signal,
) -> Result<(), PublishError> {
    let record = BusRecord::new(topic, Some(signal.symbol.clone()), &signal.payload())?;
    bus.send(record).await?;
    bus.flush().await
}

impl fmt::Debug for SignalPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalPublisher")
            .field("connected", &self.is_connected())
            .field("topic", &self.topic)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBus;
    use chrono::Utc;
    use trading_core::types::SignalType;

    fn buy_signal(symbol: &str) -> Signal {
        Signal {
            symbol: symbol.to_string(),
            signal_type: SignalType::Buy,
            confidence: 0.7,
            price: 160.0,
            quantity: 100,
            reason: "Fast MA (155.00) crossed above Slow MA (152.50)".to_string(),
            fast_ma: 155.0,
            slow_ma: 152.5,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_disconnected_publish_is_degraded() {
        let mut publisher = SignalPublisher::disconnected(DEFAULT_TOPIC);

        assert!(!publisher.is_connected());
        assert_eq!(
            publisher.publish(buy_signal("AAPL")).await,
            PublishOutcome::Degraded
        );
        // Closing a disconnected publisher is a no-op
        publisher.close().await;
    }

    #[tokio::test]
    async fn test_connected_publish_delivers_payload() {
        let handle = MemoryBus::new();
        let mut publisher = SignalPublisher::new(Box::new(handle.clone()), DEFAULT_TOPIC);

        let outcome = publisher.publish(buy_signal("AAPL")).await;
        assert_eq!(outcome, PublishOutcome::Delivered);

        let records = handle.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "strategy-signals");
        assert_eq!(records[0].key.as_deref(), Some("AAPL"));
        assert_eq!(records[0].payload["signal"], "BUY");
        assert_eq!(records[0].payload["price"], 160.0);
        assert_eq!(records[0].payload["quantity"], 100);
    }

    #[tokio::test]
    async fn test_send_failure_is_degraded_and_not_retried() {
        let handle = MemoryBus::new();
        let mut publisher = SignalPublisher::new(Box::new(handle.clone()), DEFAULT_TOPIC);

        handle.set_fail_sends(true);
        assert_eq!(
            publisher.publish(buy_signal("MSFT")).await,
            PublishOutcome::Degraded
        );

        handle.set_fail_sends(false);
        assert_eq!(
            publisher.publish(buy_signal("TSLA")).await,
            PublishOutcome::Delivered
        );

        let symbols: Vec<_> = handle
            .records()
            .into_iter()
            .filter_map(|r| r.key)
            .collect();
        assert_eq!(symbols, vec!["TSLA".to_string()]);
    }

    #[tokio::test]
    async fn test_close_releases_bus() {
        let handle = MemoryBus::new();
        let mut publisher = SignalPublisher::new(Box::new(handle.clone()), DEFAULT_TOPIC);

        publisher.close().await;
        assert!(handle.is_closed());
        assert!(!publisher.is_connected());
        assert_eq!(
            publisher.publish(buy_signal("AAPL")).await,
            PublishOutcome::Degraded
        );
    }
}
