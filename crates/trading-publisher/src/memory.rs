//! In-memory message bus for dry runs and tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use trading_core::error::PublishError;
use trading_core::traits::{BusRecord, MessageBus};

#[derive(Debug, Default)]
struct MemoryBusState {
    pending: Vec<BusRecord>,
    delivered: VecDeque<BusRecord>,
    delivered_count: u64,
    /// Keep at most this many delivered records (all when unset)
    retain: Option<usize>,
    fail_sends: bool,
    closed: bool,
}

/// Message bus that keeps delivered records in memory.
///
/// Clones share the same state, so a handle kept outside the publisher can
/// inspect what was delivered. A bounded bus keeps only the most recent
/// records but still counts every delivery.
#[derive(Debug, Clone, Default)]
pub struct MemoryBus {
    state: Arc<Mutex<MemoryBusState>>,
}

impl MemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus retaining only the last `retain` delivered records.
    pub fn bounded(retain: usize) -> Self {
        let bus = Self::default();
        bus.state.lock().unwrap().retain = Some(retain);
        bus
    }

    /// Make every subsequent send fail (or succeed again).
    pub fn set_fail_sends(&self, fail: bool) {
        self.state.lock().unwrap().fail_sends = fail;
    }

    /// Retained records that have been flushed, oldest first.
    pub fn records(&self) -> Vec<BusRecord> {
        self.state.lock().unwrap().delivered.iter().cloned().collect()
    }

    /// Number of records flushed since creation.
    pub fn delivered_count(&self) -> u64 {
        self.state.lock().unwrap().delivered_count
    }

    /// Records sent but not yet flushed.
    pub fn pending(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

#[async_trait]
impl MessageBus for MemoryBus {
    async fn send(&mut self, record: BusRecord) -> Result<(), PublishError> {
        let mut state = self.state.lock().unwrap();
        if state.closed {
            return Err(PublishError::NotConnected("memory".into()));
        }
        if state.fail_sends {
            return Err(PublishError::SendFailed("memory bus configured to fail".into()));
        }
        state.pending.push(record);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), PublishError> {
        let mut state = self.state.lock().unwrap();
        let pending = std::mem::take(&mut state.pending);
        state.delivered_count += pending.len() as u64;
        state.delivered.extend(pending);
        if let Some(retain) = state.retain {
            let excess = state.delivered.len().saturating_sub(retain);
            state.delivered.drain(..excess);
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), PublishError> {
        self.flush().await?;
        self.state.lock().unwrap().closed = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
