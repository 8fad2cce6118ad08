//! Refresh scheduling and view-state ownership.
//!
//! A spawned background task drives the fetcher on a fixed interval and
//! on demand (manual refresh, filter change) and is the single writer of
//! the published [`ViewState`]. Consumers hold a cheap cloneable
//! [`FeedHandle`]: commands flow in over an mpsc channel, state flows
//! out over a [`tokio::sync::watch`] channel.
//!
//! Fetches run as spawned tasks reporting back over an internal channel,
//! so the scheduler never blocks on the network. Each fetch is tagged
//! with a monotonically increasing sequence number at start time; a
//! completion (success or error) whose sequence is not newer than the
//! last applied one is discarded, so the fetch that *started* last wins
//! regardless of resolution order.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use crime_feed_engine_models::{FeedSnapshot, FilterState, ViewState};
use crime_feed_incident_models::{IncidentCategory, IncidentRecord};
use crime_feed_source::{FetchError, IncidentSource};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;

use crate::filter;

/// Default period between automatic refreshes.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Fixed period between automatic refreshes. There is no backoff;
    /// failures retry at the same period. Must be non-zero.
    pub refresh_interval: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

/// Commands a consumer can issue into the engine.
enum Command {
    ToggleCategory(IncidentCategory),
    Refresh,
    Shutdown,
}

/// Completion of one fetch round trip, tagged with its start sequence.
struct FetchOutcome {
    seq: u64,
    result: Result<Vec<IncidentRecord>, FetchError>,
}

/// Raw records from the last applied successful fetch, kept so filter
/// changes can re-derive the visible set without waiting for the network.
struct CachedFetch {
    records: Vec<IncidentRecord>,
    fetched_at: DateTime<Utc>,
}

/// Consumer-side handle to a running feed scheduler.
///
/// Cloning is cheap. The scheduler deactivates when every handle has
/// been dropped or [`FeedHandle::shutdown`] is called.
#[derive(Clone)]
pub struct FeedHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ViewState>,
}

impl FeedHandle {
    /// Returns a receiver for observing view-state transitions.
    #[must_use]
    pub fn view_state(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Returns a clone of the current view state.
    #[must_use]
    pub fn current(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Flips the visibility toggle for `category`.
    ///
    /// The visible set is re-derived immediately from the cached records
    /// and a background refresh is triggered. No-op after shutdown.
    pub fn toggle_category(&self, category: IncidentCategory) {
        let _ = self.commands.send(Command::ToggleCategory(category));
    }

    /// Requests an immediate refresh. No-op after shutdown.
    pub fn request_refresh(&self) {
        let _ = self.commands.send(Command::Refresh);
    }

    /// Deactivates the scheduler: the repeating timer stops and the
    /// background task exits. In-flight fetches are left to finish and
    /// their results are discarded.
    pub fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown);
    }
}

/// Spawns a feed scheduler driving `source` and returns its handle.
///
/// The first fetch fires immediately; subsequent automatic fetches fire
/// every `config.refresh_interval`.
///
/// Must be called from within a tokio runtime.
///
/// # Panics
///
/// Panics if `config.refresh_interval` is zero.
#[must_use]
pub fn spawn(source: Arc<dyn IncidentSource>, config: FeedConfig) -> FeedHandle {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(ViewState::Idle);

    tokio::spawn(run(source, config, commands_rx, state_tx));

    FeedHandle {
        commands: commands_tx,
        state: state_rx,
    }
}

/// Scheduler event loop.
async fn run(
    source: Arc<dyn IncidentSource>,
    config: FeedConfig,
    mut commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<ViewState>,
) {
    let (completions_tx, mut completions_rx) = mpsc::unbounded_channel();

    let mut task = SchedulerTask {
        source,
        state,
        completions: completions_tx,
        filter: FilterState::default(),
        cached: None,
        next_seq: 0,
        applied_seq: 0,
    };

    let mut interval = tokio::time::interval(config.refresh_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log::info!(
        "Feed scheduler started for {} (refresh every {:?})",
        task.source.name(),
        config.refresh_interval
    );

    loop {
        tokio::select! {
            _ = interval.tick() => task.start_fetch(),
            command = commands.recv() => match command {
                Some(Command::ToggleCategory(category)) => task.toggle_category(category),
                Some(Command::Refresh) => {
                    log::info!("Manual refresh requested");
                    task.start_fetch();
                }
                Some(Command::Shutdown) | None => break,
            },
            Some(outcome) = completions_rx.recv() => task.apply_outcome(outcome),
        }
    }

    log::info!("Feed scheduler stopped");
}

/// Mutable scheduler state, owned by the event loop.
struct SchedulerTask {
    source: Arc<dyn IncidentSource>,
    state: watch::Sender<ViewState>,
    completions: mpsc::UnboundedSender<FetchOutcome>,
    filter: FilterState,
    cached: Option<CachedFetch>,
    next_seq: u64,
    applied_seq: u64,
}

impl SchedulerTask {
    /// Transitions to `Loading` and spawns one fetch round trip.
    fn start_fetch(&mut self) {
        self.next_seq += 1;
        let seq = self.next_seq;

        let previous = self.state.borrow().snapshot().cloned();
        self.state.send_replace(ViewState::Loading { previous });

        log::debug!("Starting fetch #{seq}");
        let source = Arc::clone(&self.source);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let result = source.fetch().await;
            // The scheduler may have shut down mid-flight.
            let _ = completions.send(FetchOutcome { seq, result });
        });
    }

    /// Flips `category`, re-derives the visible set from the cached
    /// records, and triggers a background refresh.
    fn toggle_category(&mut self, category: IncidentCategory) {
        self.filter.toggle(category);
        log::info!(
            "Category {category} {}",
            if self.filter.is_enabled(category) {
                "enabled"
            } else {
                "disabled"
            }
        );

        if let Some(cached) = &self.cached {
            let mut snapshot = filter::apply(&cached.records, &self.filter);
            snapshot.last_updated = Some(cached.fetched_at);
            self.state
                .send_modify(|state| replace_snapshot(state, snapshot));
        }

        self.start_fetch();
    }

    /// Applies a fetch completion, discarding stale ones.
    fn apply_outcome(&mut self, outcome: FetchOutcome) {
        if outcome.seq <= self.applied_seq {
            log::debug!(
                "Discarding stale fetch #{} (already applied #{})",
                outcome.seq,
                self.applied_seq
            );
            return;
        }
        self.applied_seq = outcome.seq;

        match outcome.result {
            Ok(records) => {
                let fetched_at = Utc::now();
                let mut snapshot = filter::apply(&records, &self.filter);
                snapshot.last_updated = Some(fetched_at);
                log::info!(
                    "Fetch #{} succeeded: {} records, {} visible",
                    outcome.seq,
                    records.len(),
                    snapshot.visible.len()
                );
                self.cached = Some(CachedFetch {
                    records,
                    fetched_at,
                });
                self.state.send_replace(ViewState::Success { snapshot });
            }
            Err(e) => {
                log::warn!("Fetch #{} failed: {e}", outcome.seq);
                let previous = self.state.borrow().snapshot().cloned();
                self.state.send_replace(ViewState::Error {
                    message: e.to_string(),
                    previous,
                });
            }
        }
    }
}

/// Swaps the snapshot carried by the current variant for a re-derived
/// one, leaving the lifecycle stage itself unchanged.
fn replace_snapshot(state: &mut ViewState, snapshot: FeedSnapshot) {
    match state {
        ViewState::Idle => {}
        ViewState::Loading { previous } | ViewState::Error { previous, .. } => {
            *previous = Some(snapshot);
        }
        ViewState::Success { snapshot: current } => *current = snapshot,
    }
}
