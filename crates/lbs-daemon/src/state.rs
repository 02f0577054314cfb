//! Shared runtime state for lbs-daemon.
//!
//! The scheduler writes, the status handlers read. Handlers receive
//! `State<Arc<AppState>>` from Axum; this module owns nothing async itself.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lbs_reconcile::{BoardKey, CycleError, CycleReport};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health / status responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// StatusSnapshot
// ---------------------------------------------------------------------------

/// Where the scheduler currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Starting,
    Syncing,
    /// Last cycle succeeded; waiting for the next interval.
    Idle,
    /// Last cycle failed; waiting for the error backoff.
    Backoff,
    Stopped,
}

/// Point-in-time snapshot of the sync loop, returned by GET /v1/status.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub daemon_uptime_secs: u64,
    pub key: String,
    pub state: SyncPhase,
    pub cycles_ok: u64,
    pub cycles_failed: u64,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    /// Messages currently tracked for `key` after the last successful cycle.
    pub published: usize,
    pub next_cycle_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Cloneable (Arc) handle shared by the scheduler and all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    pub status: Arc<RwLock<StatusSnapshot>>,
}

impl AppState {
    pub fn new(key: &BoardKey) -> Self {
        let initial = StatusSnapshot {
            daemon_uptime_secs: uptime_secs(),
            key: key.to_string(),
            state: SyncPhase::Starting,
            cycles_ok: 0,
            cycles_failed: 0,
            last_success_at: None,
            last_error: None,
            published: 0,
            next_cycle_at: None,
        };
        Self {
            build: BuildInfo {
                service: "lbs-daemon",
                version: env!("CARGO_PKG_VERSION"),
            },
            status: Arc::new(RwLock::new(initial)),
        }
    }

    pub async fn snapshot(&self) -> StatusSnapshot {
        let mut snap = self.status.read().await.clone();
        snap.daemon_uptime_secs = uptime_secs();
        snap
    }

    pub async fn set_phase(&self, phase: SyncPhase) {
        let mut st = self.status.write().await;
        st.state = phase;
        if matches!(phase, SyncPhase::Syncing | SyncPhase::Stopped) {
            st.next_cycle_at = None;
        }
    }

    pub async fn record_success(&self, report: &CycleReport, next_cycle_at: DateTime<Utc>) {
        let mut st = self.status.write().await;
        st.state = SyncPhase::Idle;
        st.cycles_ok += 1;
        st.last_success_at = Some(Utc::now());
        st.last_error = None;
        st.published = report.reconcile.published.len();
        st.next_cycle_at = Some(next_cycle_at);
    }

    pub async fn record_failure(&self, err: &CycleError, next_cycle_at: DateTime<Utc>) {
        let mut st = self.status.write().await;
        st.state = SyncPhase::Backoff;
        st.cycles_failed += 1;
        st.last_error = Some(err.to_string());
        st.next_cycle_at = Some(next_cycle_at);
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Monotonically increasing uptime since first call (process lifetime).
pub fn uptime_secs() -> u64 {
    static START: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();
    START
        .get_or_init(std::time::Instant::now)
        .elapsed()
        .as_secs()
}
