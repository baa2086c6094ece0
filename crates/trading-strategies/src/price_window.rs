//! Bounded per-symbol price history.

use std::collections::{HashMap, VecDeque};

/// Default number of prices kept per symbol.
pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// Fixed-capacity, insertion-ordered window of last-trade prices.
#[derive(Debug, Clone)]
pub struct PriceWindow {
    prices: VecDeque<f64>,
    capacity: usize,
}

impl PriceWindow {
    /// Create an empty window holding at most `capacity` prices.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Window capacity must be greater than 0");
        Self {
            prices: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new price, returning the evicted oldest price if at capacity.
    pub fn push(&mut self, price: f64) -> Option<f64> {
        let evicted = if self.prices.len() >= self.capacity {
            self.prices.pop_front()
        } else {
            None
        };
        self.prices.push_back(price);
        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Whether the window holds `capacity` prices.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.prices.len() == self.capacity
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent price.
    pub fn latest(&self) -> Option<f64> {
        self.prices.back().copied()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.prices.iter()
    }

    /// Copy of the window contents, oldest first.
    pub fn to_vec(&self) -> Vec<f64> {
        self.prices.iter().copied().collect()
    }
}

/// Per-symbol price windows.
///
/// Each symbol's window is independent; the store is owned by whoever drives
/// evaluation and lent out by `&mut` for appends.
#[derive(Debug, Clone)]
pub struct PriceHistoryStore {
    capacity: usize,
    windows: HashMap<String, PriceWindow>,
}

impl PriceHistoryStore {
    /// Create an empty store whose windows hold `capacity` prices.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Window capacity must be greater than 0");
        Self {
            capacity,
            windows: HashMap::new(),
        }
    }

    /// Create a store with an empty window for each symbol.
    pub fn with_symbols(capacity: usize, symbols: &[String]) -> Self {
        let mut store = Self::new(capacity);
        for symbol in symbols {
            store
                .windows
                .insert(symbol.clone(), PriceWindow::new(capacity));
        }
        store
    }

    /// Append a price to the symbol's window, evicting the oldest if full.
    pub fn append(&mut self, symbol: &str, price: f64) {
        let capacity = self.capacity;
        self.windows
            .entry(symbol.to_string())
            .or_insert_with(|| PriceWindow::new(capacity))
            .push(price);
    }

    /// Current window contents for a symbol, oldest first.
    ///
    /// Unknown symbols yield an empty vector.
    pub fn snapshot(&self, symbol: &str) -> Vec<f64> {
        self.windows
            .get(symbol)
            .map(PriceWindow::to_vec)
            .unwrap_or_default()
    }

    /// Number of prices held for a symbol.
    pub fn len(&self, symbol: &str) -> usize {
        self.windows.get(symbol).map_or(0, PriceWindow::len)
    }

    /// Read-only view of a symbol's window.
    pub fn window(&self, symbol: &str) -> Option<&PriceWindow> {
        self.windows.get(symbol)
    }

    /// Window capacity shared by every symbol.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of symbols with a window.
    pub fn symbol_count(&self) -> usize {
        self.windows.len()
    }
}
