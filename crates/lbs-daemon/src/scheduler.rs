//! Cooperative timer loop around [`SyncEngine::run_cycle`].
//!
//! - One cycle at a time: cycles run inline on the loop task, never spawned.
//! - After a successful cycle the next one starts after `interval`; after a
//!   failed one, after `error_backoff`.
//! - Waits are sliced to at most [`MAX_SLEEP_SLICE`] and raced against the
//!   cancellation token. A cycle already in progress is never interrupted.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lbs_reconcile::{BoardKey, LeaderboardSource, MessageChannel, PublishedStore, SyncEngine};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::state::{AppState, SyncPhase};

pub const MAX_SLEEP_SLICE: Duration = Duration::from_secs(60);

pub struct Scheduler<S, C, P> {
    engine: SyncEngine<S, C, P>,
    key: BoardKey,
    interval: Duration,
    error_backoff: Duration,
    state: Arc<AppState>,
}

impl<S, C, P> Scheduler<S, C, P>
where
    S: LeaderboardSource,
    C: MessageChannel,
    P: PublishedStore,
{
    pub fn new(
        engine: SyncEngine<S, C, P>,
        key: BoardKey,
        interval: Duration,
        error_backoff: Duration,
        state: Arc<AppState>,
    ) -> Self {
        Self {
            engine,
            key,
            interval,
            error_backoff,
            state,
        }
    }

    /// Run until `cancel` fires, then hand the engine back.
    pub async fn run(mut self, cancel: CancellationToken) -> SyncEngine<S, C, P> {
        info!(
            key = %self.key,
            interval_secs = self.interval.as_secs(),
            backoff_secs = self.error_backoff.as_secs(),
            "sync loop starting"
        );

        while !cancel.is_cancelled() {
            self.state.set_phase(SyncPhase::Syncing).await;
            info!(key = %self.key, "updating leaderboard");

            let wait = match self.engine.run_cycle(&self.key).await {
                Ok(report) => {
                    info!(
                        key = %self.key,
                        members = report.members,
                        panels = report.panels,
                        messages = report.reconcile.published.len(),
                        created = report.reconcile.created.len(),
                        deleted = report.reconcile.deleted,
                        "update successful"
                    );
                    self.state
                        .record_success(&report, next_at(self.interval))
                        .await;
                    self.interval
                }
                Err(err) => {
                    error!(key = %self.key, error = %err, "update failed");
                    self.state
                        .record_failure(&err, next_at(self.error_backoff))
                        .await;
                    self.error_backoff
                }
            };

            if !sleep_sliced(wait, &cancel).await {
                break;
            }
        }

        self.state.set_phase(SyncPhase::Stopped).await;
        info!(key = %self.key, "sync loop stopped");
        self.engine
    }
}

fn next_at(wait: Duration) -> chrono::DateTime<Utc> {
    Utc::now() + chrono::Duration::from_std(wait).unwrap_or_else(|_| chrono::Duration::zero())
}

/// Sleep `total` in slices of at most [`MAX_SLEEP_SLICE`]. Returns `false` if
/// cancelled first.
pub async fn sleep_sliced(total: Duration, cancel: &CancellationToken) -> bool {
    let mut remaining = total;
    loop {
        if cancel.is_cancelled() {
            return false;
        }
        if remaining.is_zero() {
            return true;
        }
        let slice = remaining.min(MAX_SLEEP_SLICE);
        tokio::select! {
            _ = cancel.cancelled() => return false,
            _ = tokio::time::sleep(slice) => {}
        }
        remaining = remaining.saturating_sub(slice);
    }
}
