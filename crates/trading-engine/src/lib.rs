//! Real-time signal detection loop.
//!
//! - `SignalEngine`: fetch a quote, extend the symbol's window, detect a crossover
//! - `Scheduler`: run the engine over every symbol at a fixed interval and
//!   publish what it finds
//! - `connect_feed` / `connect_publisher`: startup wiring with degraded fallbacks

mod bootstrap;
mod scheduler;
mod signal_engine;
mod summary;

#[cfg(test)]
mod testing;

pub use bootstrap::{connect_feed, connect_publisher};
pub use scheduler::{Scheduler, SchedulerConfig, SchedulerState};
pub use signal_engine::SignalEngine;
pub use summary::RunSummary;
