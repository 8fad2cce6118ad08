#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal feed watcher.
//!
//! A stand-in for the presentation layer: starts the feed engine against
//! a live endpoint (or the built-in demo data), subscribes to its view
//! state, and renders every transition until Ctrl-C.

mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crime_feed_engine::{FeedConfig, scheduler};
use crime_feed_engine_models::ViewState;
use crime_feed_source::{HttpIncidentSource, IncidentSource, StaticIncidentSource};

/// Command-line flags. Flags override config-file values; built-in
/// defaults cover anything left unset.
#[derive(Parser)]
#[command(name = "crime_feed", about = "Watch a crime incident feed from the terminal")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Incident API endpoint.
    #[arg(long)]
    api_url: Option<String>,

    /// Seconds between automatic refreshes.
    #[arg(long)]
    refresh_secs: Option<u64>,

    /// Serve the built-in demo records instead of a live endpoint.
    #[arg(long)]
    demo: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => config::load(path)?,
        None => config::FileConfig::default(),
    };

    let source: Arc<dyn IncidentSource> = if cli.demo {
        Arc::new(StaticIncidentSource::demo())
    } else {
        let api_url = cli.api_url.clone().or_else(|| file.source.api_url.clone()).ok_or(
            "no API endpoint configured; pass --api-url, set [source].api_url, or use --demo",
        )?;
        let timeout = file
            .source
            .request_timeout_secs
            .map_or(config::DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);
        Arc::new(HttpIncidentSource::new(api_url, timeout)?)
    };

    let refresh_interval = cli
        .refresh_secs
        .or(file.feed.refresh_interval_secs)
        .map_or(scheduler::DEFAULT_REFRESH_INTERVAL, Duration::from_secs);

    log::info!("Watching {}", source.name());
    let handle = scheduler::spawn(source, FeedConfig { refresh_interval });
    let mut state = handle.view_state();

    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                report(&state.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Shutting down");
                handle.shutdown();
                break;
            }
        }
    }

    Ok(())
}

/// Renders one view-state transition to the terminal.
fn report(state: &ViewState) {
    match state {
        ViewState::Idle => {}
        ViewState::Loading { previous } => {
            let shown = previous.as_ref().map_or(0, |s| s.visible.len());
            log::info!("Refreshing ({shown} incidents still shown)");
        }
        ViewState::Success { snapshot } => {
            let updated = snapshot.last_updated.map_or_else(
                || "never".to_string(),
                |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            );
            println!();
            println!(
                "Recent incidents: {} (last updated {updated})",
                snapshot.visible.len()
            );
            for (category, count) in &snapshot.counts_by_category {
                println!("  {category}: {count}");
            }
            for incident in &snapshot.visible {
                println!(
                    "  [{}] {}: {}",
                    incident.occurred_at.format("%Y-%m-%d %H:%M"),
                    incident.category,
                    incident.description
                );
            }
        }
        ViewState::Error { message, previous } => {
            if let Some(snapshot) = previous {
                log::warn!(
                    "Refresh failed: {message} (still showing {} incidents from the last update)",
                    snapshot.visible.len()
                );
            } else {
                log::warn!("Refresh failed: {message}");
            }
        }
    }
}
