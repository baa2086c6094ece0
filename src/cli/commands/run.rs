//! Run command implementation.

use anyhow::{Context, Result};
use tracing::info;
use trading_config::AppConfig;
use trading_engine::{connect_feed, Scheduler, SchedulerConfig, SignalEngine};
use trading_publisher::{MemoryBus, SignalPublisher};
use trading_strategies::MACrossoverDetector;

use crate::cli::RunArgs;

/// Signals kept in memory during a dry run; older ones are only counted.
const DRY_RUN_RETAINED: usize = 256;

pub async fn run(args: RunArgs, mut config: AppConfig) -> Result<()> {
    if !args.symbols.is_empty() {
        config.scheduler.symbols = args.symbols.clone();
    }
    if let Some(interval) = args.interval {
        config.scheduler.interval_secs = interval;
    }
    if args.max_ticks.is_some() {
        config.scheduler.max_ticks = args.max_ticks;
    }
    if args.synthetic {
        config.cache.enabled = false;
    }

    let mut scheduler = if args.dry_run {
        config.validate().context("Invalid configuration")?;
        info!("Dry run: signals go to an in-memory bus");

        let detector = MACrossoverDetector::new(config.strategy.clone())?;
        let feed = connect_feed(&config.cache, &config.feed).await;
        let publisher = SignalPublisher::new(
            Box::new(MemoryBus::bounded(DRY_RUN_RETAINED)),
            config.bus.topic.clone(),
        );
        Scheduler::new(
            SchedulerConfig::from(&config.scheduler),
            SignalEngine::new(feed, detector),
            publisher,
        )
    } else {
        Scheduler::init(&config)
            .await
            .context("Failed to start signal generator")?
    };

    let summary = scheduler.run().await;
    println!("{}", summary.summary());

    Ok(())
}
