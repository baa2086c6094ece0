//! Core types and traits for the signal generator.
//!
//! This crate provides the foundational building blocks including:
//! - Market data snapshots (Quote)
//! - Trading signals and their wire payload
//! - Collaborator traits for the quote cache and the message bus

pub mod types;
pub mod traits;
pub mod error;

pub use error::TradingError;
pub use types::*;
pub use traits::*;
