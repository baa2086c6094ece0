//! Fixed-interval evaluation loop.

use chrono::Utc;
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};
use trading_config::{AppConfig, SchedulerSettings};
use trading_core::error::TradingError;
use trading_publisher::SignalPublisher;
use trading_strategies::{MACrossoverDetector, PriceHistoryStore};

use crate::bootstrap::{connect_feed, connect_publisher};
use crate::signal_engine::SignalEngine;
use crate::summary::RunSummary;

/// Lifecycle of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Init,
    Running,
    Stopped,
}

/// Loop settings.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time between the starts of two passes
    pub interval: Duration,
    /// Symbols evaluated each pass, in this order
    pub symbols: Vec<String>,
    /// Stop after this many passes
    pub max_ticks: Option<u64>,
}

impl From<&SchedulerSettings> for SchedulerConfig {
    fn from(settings: &SchedulerSettings) -> Self {
        Self {
            interval: Duration::from_secs(settings.interval_secs),
            symbols: settings.symbols.clone(),
            max_ticks: settings.max_ticks,
        }
    }
}

/// Drives the signal engine over every symbol once per interval and hands
/// detected signals to the publisher.
///
/// Owns the per-symbol price history. A pass is strictly sequential and is
/// never interrupted: shutdown is observed between passes only.
pub struct Scheduler {
    config: SchedulerConfig,
    engine: SignalEngine,
    publisher: SignalPublisher,
    history: PriceHistoryStore,
    state: SchedulerState,
    summary: RunSummary,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig, engine: SignalEngine, publisher: SignalPublisher) -> Self {
        let history = PriceHistoryStore::with_symbols(engine.window_size(), &config.symbols);
        Self {
            config,
            engine,
            publisher,
            history,
            state: SchedulerState::Init,
            summary: RunSummary::new(),
        }
    }

    /// Validate the configuration and connect both collaborators.
    ///
    /// Unreachable dependencies downgrade the feed or the publisher; only an
    /// invalid configuration is an error.
    pub async fn init(config: &AppConfig) -> Result<Self, TradingError> {
        config.validate()?;
        let detector = MACrossoverDetector::new(config.strategy.clone())?;

        let feed = connect_feed(&config.cache, &config.feed).await;
        let publisher = connect_publisher(&config.bus).await;

        info!(
            feed = %feed.mode(),
            bus_connected = publisher.is_connected(),
            "Signal generator initialized"
        );

        Ok(Self::new(
            SchedulerConfig::from(&config.scheduler),
            SignalEngine::new(feed, detector),
            publisher,
        ))
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn history(&self) -> &PriceHistoryStore {
        &self.history
    }

    /// Evaluate every symbol once, in configured order.
    pub async fn run_pass(&mut self) {
        self.summary.ticks += 1;
        debug!(tick = self.summary.ticks, "Evaluation pass");

        for symbol in &self.config.symbols {
            self.summary.evaluations += 1;

            let Some(signal) = self.engine.evaluate(symbol, &mut self.history).await else {
                continue;
            };

            info!(
                signal = %signal.signal_type,
                symbol = %signal.symbol,
                price = signal.price,
                quantity = signal.quantity,
                confidence = signal.confidence,
                reason = %signal.reason,
                "Signal detected"
            );

            let signal_type = signal.signal_type;
            let outcome = self.publisher.publish(signal).await;
            self.summary.record_signal(signal_type, outcome);
        }

        self.summary.feed_fallbacks = self.engine.feed_fallbacks();
    }

    /// Run passes every interval until `shutdown` resolves or the tick limit
    /// is reached, then close the publisher.
    ///
    /// The first pass starts immediately. A pass that overruns the interval
    /// delays the next one instead of bunching ticks.
    pub async fn run_until<F>(&mut self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        if self.state == SchedulerState::Stopped {
            return self.summary.clone();
        }

        self.state = SchedulerState::Running;
        info!(
            symbols = ?self.config.symbols,
            interval_secs = self.config.interval.as_secs_f64(),
            feed = %self.engine.feed_mode(),
            "Signal generator running"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            if let Some(max_ticks) = self.config.max_ticks {
                if self.summary.ticks >= max_ticks {
                    info!(ticks = self.summary.ticks, "Tick limit reached");
                    break;
                }
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_pass().await;
                }
            }
        }

        self.stop().await;
        self.summary.clone()
    }

    /// Run until Ctrl-C.
    pub async fn run(&mut self) -> RunSummary {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    async fn stop(&mut self) {
        self.publisher.close().await;
        self.state = SchedulerState::Stopped;
        self.summary.stopped_at = Some(Utc::now());
        info!(
            ticks = self.summary.ticks,
            signals = self.summary.signals(),
            "Signal generator stopped"
        );
    }
}
