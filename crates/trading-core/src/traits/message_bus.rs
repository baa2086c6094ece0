//! Message bus trait definition.

use crate::error::PublishError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single record handed to the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusRecord {
    /// Channel/topic name
    pub topic: String,
    /// Partitioning key (the symbol for signals)
    pub key: Option<String>,
    /// JSON payload
    pub payload: serde_json::Value,
}

impl BusRecord {
    /// Serialize `payload` into a record for `topic`.
    pub fn new<T: Serialize>(
        topic: impl Into<String>,
        key: Option<String>,
        payload: &T,
    ) -> Result<Self, PublishError> {
        Ok(Self {
            topic: topic.into(),
            key,
            payload: serde_json::to_value(payload)?,
        })
    }
}

/// Publish side of a durable message channel.
///
/// Only send-and-flush semantics are required; there is no acknowledgment
/// contract beyond the success or failure of each call.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Hand a record to the bus.
    async fn send(&mut self, record: BusRecord) -> Result<(), PublishError>;

    /// Block until previously sent records have been delivered.
    async fn flush(&mut self) -> Result<(), PublishError>;

    /// Flush and release the connection.
    async fn close(&mut self) -> Result<(), PublishError>;

    /// Get the bus name.
    fn name(&self) -> &str;
}
