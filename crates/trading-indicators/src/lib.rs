//! Technical indicators.
//!
//! Only the simple moving average is needed by the crossover detector. It is
//! evaluated over the tail of a price window.

pub mod moving_average;

pub use moving_average::Sma;
