//! Core traits.

mod message_bus;
mod quote_cache;

pub use message_bus::{BusRecord, MessageBus};
pub use quote_cache::QuoteCache;
