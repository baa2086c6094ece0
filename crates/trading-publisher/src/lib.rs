//! Signal publishing.
//!
//! `SignalPublisher` delivers signals to a `MessageBus` and degrades to a
//! logged no-op when no bus is connected. Buses provided: a Kafka producer,
//! a TCP bus writing newline-delimited JSON records and an in-memory bus.

mod kafka;
mod memory;
mod publisher;
mod tcp;

pub use kafka::KafkaMessageBus;
pub use memory::MemoryBus;
pub use publisher::{PublishOutcome, SignalPublisher, DEFAULT_TOPIC};
pub use tcp::TcpMessageBus;
