//! Core data types.

mod quote;
mod signal;

pub use quote::Quote;
pub use signal::{Signal, SignalPayload, SignalType};
