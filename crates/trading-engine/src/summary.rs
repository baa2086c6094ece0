//! Run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trading_core::types::SignalType;
use trading_publisher::PublishOutcome;

/// Counters collected while the scheduler runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub stopped_at: Option<DateTime<Utc>>,
    /// Completed passes over the symbol list
    pub ticks: u64,
    /// Symbol evaluations
    pub evaluations: u64,
    pub buy_signals: u64,
    pub sell_signals: u64,
    /// Signals sent and flushed
    pub delivered: u64,
    /// Signals dropped because the bus was down or the send failed
    pub degraded: u64,
    /// Live quote reads answered synthetically
    pub feed_fallbacks: u64,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            stopped_at: None,
            ticks: 0,
            evaluations: 0,
            buy_signals: 0,
            sell_signals: 0,
            delivered: 0,
            degraded: 0,
            feed_fallbacks: 0,
        }
    }

    pub fn signals(&self) -> u64 {
        self.buy_signals + self.sell_signals
    }

    pub(crate) fn record_signal(&mut self, signal_type: SignalType, outcome: PublishOutcome) {
        match signal_type {
            SignalType::Buy => self.buy_signals += 1,
            SignalType::Sell => self.sell_signals += 1,
        }
        match outcome {
            PublishOutcome::Delivered => self.delivered += 1,
            PublishOutcome::Degraded => self.degraded += 1,
        }
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                  SIGNAL GENERATOR SUMMARY                  \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Started:             {}\n", self.started_at.to_rfc3339()));
        if let Some(stopped_at) = self.stopped_at {
            s.push_str(&format!("  Stopped:             {}\n", stopped_at.to_rfc3339()));
        }
        s.push_str(&format!("  Ticks:               {}\n", self.ticks));
        s.push_str(&format!("  Evaluations:         {}\n", self.evaluations));
        s.push('\n');

        s.push_str("SIGNALS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Buy:                 {}\n", self.buy_signals));
        s.push_str(&format!("  Sell:                {}\n", self.sell_signals));
        s.push_str(&format!("  Delivered:           {}\n", self.delivered));
        s.push_str(&format!("  Dropped:             {}\n", self.degraded));
        s.push_str(&format!("  Synthetic fallbacks: {}\n", self.feed_fallbacks));

        s
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
