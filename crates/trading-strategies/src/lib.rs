//! Signal detection building blocks.
//!
//! - `PriceWindow` / `PriceHistoryStore`: bounded per-symbol price history
//! - `MACrossoverDetector`: dual moving-average crossover with a hysteresis band

mod ma_crossover;
mod price_window;

pub use ma_crossover::{
    MACrossoverConfig, MACrossoverDetector, SIGNAL_CONFIDENCE, SIGNAL_QUANTITY,
};
pub use price_window::{PriceHistoryStore, PriceWindow, DEFAULT_WINDOW_SIZE};
