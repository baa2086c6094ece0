//! Kafka message bus.

use async_trait::async_trait;
use chrono::Utc;
use rskafka::client::partition::{Compression, PartitionClient, UnknownTopicHandling};
use rskafka::client::{Client, ClientBuilder};
use rskafka::record::Record;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tracing::{debug, info};
use trading_core::error::PublishError;
use trading_core::traits::{BusRecord, MessageBus};

/// Kafka producer writing every record to one partition of its topic.
///
/// Records are buffered by `send` and produced by `flush`. Broker
/// reconnection is handled by the client.
pub struct KafkaMessageBus {
    client: Option<Client>,
    partitions: HashMap<String, PartitionClient>,
    partition: i32,
    pending: Vec<BusRecord>,
    name: String,
}

impl KafkaMessageBus {
    /// Connect to the bootstrap brokers and resolve `topic`.
    ///
    /// `timeout` bounds the connection and topic lookup only; produce calls
    /// have no timeout.
    pub async fn connect(
        brokers: Vec<String>,
        topic: &str,
        partition: i32,
        timeout: Duration,
    ) -> Result<Self, PublishError> {
        let name = format!("kafka-{}", brokers.join(","));

        let handshake = async {
            let client = ClientBuilder::new(brokers).build().await?;
            let topic_client = client
                .partition_client(topic.to_string(), partition, UnknownTopicHandling::Error)
                .await?;
            Ok::<_, rskafka::client::error::Error>((client, topic_client))
        };

        let (client, topic_client) = tokio::time::timeout(timeout, handshake)
            .await
            .map_err(|_| PublishError::Connection(format!("timed out connecting to {}", name)))?
            .map_err(|e| PublishError::Connection(e.to_string()))?;

        info!(bus = %name, topic, partition, "Connected to Kafka");
        let mut partitions = HashMap::new();
        partitions.insert(topic.to_string(), topic_client);

        Ok(Self {
            client: Some(client),
            partitions,
            partition,
            pending: Vec::new(),
            name,
        })
    }

    async fn partition_client(&mut self, topic: &str) -> Result<&PartitionClient, PublishError> {
        if !self.partitions.contains_key(topic) {
            let client = self
                .client
                .as_ref()
                .ok_or_else(|| PublishError::NotConnected(self.name.clone()))?;
            let topic_client = client
                .partition_client(topic.to_string(), self.partition, UnknownTopicHandling::Error)
                .await
                .map_err(|e| PublishError::SendFailed(e.to_string()))?;
            self.partitions.insert(topic.to_string(), topic_client);
        }
        self.partitions
            .get(topic)
            .ok_or_else(|| PublishError::NotConnected(self.name.clone()))
    }
}

/// Convert a bus record to a Kafka record: key bytes and the JSON payload.
fn to_kafka_record(record: &BusRecord) -> Result<Record, PublishError> {
    Ok(Record {
        key: record.key.as_ref().map(|key| key.as_bytes().to_vec()),
        value: Some(serde_json::to_vec(&record.payload)?),
        headers: BTreeMap::new(),
        timestamp: Utc::now(),
    })
}

/// Group records by topic, keeping send order within each topic.
fn batches(records: Vec<BusRecord>) -> Vec<(String, Vec<BusRecord>)> {
    let mut batches: Vec<(String, Vec<BusRecord>)> = Vec::new();
    for record in records {
        match batches.iter_mut().find(|(topic, _)| *topic == record.topic) {
            Some((_, batch)) => batch.push(record),
            None => batches.push((record.topic.clone(), vec![record])),
        }
    }
    batches
}

#[async_trait]
impl MessageBus for KafkaMessageBus {
    async fn send(&mut self, record: BusRecord) -> Result<(), PublishError> {
        if self.client.is_none() {
            return Err(PublishError::NotConnected(self.name.clone()));
        }
        self.pending.push(record);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), PublishError> {
        let pending = std::mem::take(&mut self.pending);
        for (topic, batch) in batches(pending) {
            let records = batch
                .iter()
                .map(to_kafka_record)
                .collect::<Result<Vec<_>, _>>()?;
            let count = records.len();

            let offsets = self
                .partition_client(&topic)
                .await?
                .produce(records, Compression::NoCompression)
                .await
                .map_err(|e| PublishError::SendFailed(e.to_string()))?;
            debug!(topic = %topic, count, offsets = ?offsets, "Produced records");
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), PublishError> {
        if self.client.is_none() {
            return Ok(());
        }
        let result = self.flush().await;
        self.partitions.clear();
        self.client = None;
        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}
