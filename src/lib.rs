pub mod config;
pub mod engine;
pub mod feed;
pub mod messages;
pub mod sink;
pub mod tailer;

use anyhow::Result;
use messages::{recency::RecencyTracker, selector::Selector};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::filter::Directive;

/// Entry point of the binary: config dir from argv / env, logging, pipeline.
pub fn run() -> Result<()> {
    let config_dir = config::config_dir_from(
        std::env::args().nth(1),
        std::env::var("TIBIA_ANNOUNCER_DIR").ok(),
    );
    let log_dir = init_logging(&config_dir)?;
    tracing::info!("Tibia announcer starting, logs → {}", log_dir.display());

    let cfg = config::load_or_default(&config_dir)?;
    if cfg.guilds.is_empty() {
        tracing::warn!("No guilds configured in {:?}, nothing will be announced", config_dir);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let result  = runtime.block_on(start_pipeline(cfg, config_dir));
    // The tailer thread blocks on filesystem events; don't wait for it.
    runtime.shutdown_timeout(Duration::from_secs(1));
    result
}

// ---------------------------------------------------------------------------
// Logging: a daily rolling file in <config dir>/logs, no ANSI colour codes.
// Panics are routed through tracing so they end up in the same file.
// ---------------------------------------------------------------------------
fn init_logging(config_dir: &Path) -> Result<PathBuf> {
    let log_dir = config_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "announcer.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // Lives as long as the process; dropping it would stop the flushing.
    std::mem::forget(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tibia_announcer_lib=debug".parse::<Directive>()?),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown location".to_string());
        let message = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        tracing::error!("PANIC at {}: {}", location, message);
    }));

    Ok(log_dir)
}

/// Pipeline: tailer -> feed -> engine -> sink. Runs until the feed side
/// closes or the process is interrupted.
async fn start_pipeline(cfg: config::AppConfig, config_dir: PathBuf) -> Result<()> {
    let (raw_tx, raw_rx)           = mpsc::channel::<String>(2048);
    let (event_tx, event_rx)       = mpsc::channel::<feed::TrackerEvent>(1024);
    let (announce_tx, announce_rx) = mpsc::channel::<engine::Announcement>(128);

    let feed_path = cfg.resolved_feed_path(&config_dir);
    let recent    = Arc::new(RecencyTracker::new(cfg.recent_capacity));
    let announcer = engine::Announcer::new(cfg.clone(), Selector::new(recent));
    let sink      = sink::Sink::new(std::io::stdout(), cfg.message_limit);

    // notify + blocking reads: keep the tailer off the async workers
    tokio::task::spawn_blocking(move || {
        if let Err(e) = tailer::run(feed_path, raw_tx) {
            tracing::error!("Tailer stopped: {}", e);
        }
    });
    tokio::spawn(feed::run(raw_rx, event_tx));
    tokio::spawn(engine::run(event_rx, announce_tx, announcer));
    let delivery = tokio::spawn(sink::run(announce_rx, sink));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, shutting down");
        }
        res = delivery => {
            match res {
                Ok(Ok(_))  => tracing::info!("Pipeline drained, shutting down"),
                Ok(Err(e)) => tracing::error!("Sink stopped: {}", e),
                Err(e)     => tracing::error!("Sink task failed: {}", e),
            }
        }
    }
    Ok(())
}
