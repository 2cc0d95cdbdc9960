//! tablet-ink - Reference host
//!
//! Opens the configured tablet device, steps the ingestion session until the
//! device fails or closes, and prints every completed stroke to stdout as one
//! JSON line for an external recognizer.
//!
//! Usage: `tablet-ink [CONFIG]`

use anyhow::Context;
use serde_json::json;
use std::path::PathBuf;
use tablet_ink::config::{default_config_path, LoggingConfig, TabletConfig};
use tablet_ink::{create_driver, IngestSession, StrokeBuffer, TabletError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor the config sets one
const DEFAULT_LOG_FILTER: &str = "info,tablet_ink=debug";

fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(logging.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER))
    });

    let (file_layer, guard) = match &logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tablet-ink.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    let config_path: Option<PathBuf> = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| default_config_path().filter(|p| p.exists()));

    let loaded = config_path.as_ref().map(|path| TabletConfig::load(path));
    let config = match &loaded {
        Some(Ok(config)) => config.clone(),
        _ => TabletConfig::default(),
    };

    // Logging needs the config, so config errors are reported just after
    let _log_guard = init_logging(&config.logging);
    match (&config_path, loaded) {
        (Some(path), Some(Ok(_))) => tracing::info!("Loaded configuration from {:?}", path),
        (Some(path), Some(Err(e))) => {
            return Err(e).with_context(|| format!("Invalid configuration file {:?}", path));
        }
        _ => tracing::info!("No configuration file, using defaults"),
    }

    let driver = create_driver(&config.device.driver, &config)
        .context("Failed to select tablet driver")?;

    let mut completed = 0u64;
    let trigger = move |strokes: &StrokeBuffer| {
        completed += 1;
        let points: Vec<[i32; 2]> = strokes
            .last_completed_stroke()
            .unwrap_or_default()
            .iter()
            .map(|p| [p.x, p.y])
            .collect();
        println!("{}", json!({ "stroke": completed, "points": points }));
    };

    let mut session = IngestSession::open(&config, driver, trigger)
        .with_context(|| format!("Failed to start session on {:?}", config.device.path))?;

    #[cfg(unix)]
    tracing::info!("Device readable on fd {}", session.readiness_fd());

    // Blocking reads stand in for a readiness loop: each read returns once data is available
    let outcome = loop {
        match session.step() {
            Ok(report) => {
                if !report.is_empty() {
                    tracing::trace!("Step: {:?}", report);
                }
            }
            Err(e) if e.is_fatal() => break e,
            Err(e) => tracing::warn!("Step failed, continuing: {}", e),
        }
    };

    let read_stats = session.read_stats().clone();
    let stats = session.teardown();
    tracing::info!(
        "Read {} packets in {} reads ({} short), {} strokes",
        read_stats.packets_read,
        read_stats.read_calls,
        read_stats.short_reads,
        stats.strokes_completed
    );

    match outcome {
        TabletError::Device { source: None, .. } => {
            tracing::info!("Device stream ended");
            Ok(())
        }
        e => Err(e).context("Tablet device failed"),
    }
}
