use chrono::{DateTime, Utc};
use lbs_board::{BatchLimits, PageLayout};
use tracing::debug;

use crate::{
    engine, BoardKey, CycleError, LeaderboardSource, MessageChannel, PublishedStore,
    ReconcileReport,
};

/// Summary of one completed cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleReport {
    pub key: BoardKey,
    /// Members in the fetched payload (before the rank cap).
    pub members: usize,
    /// Panels rendered (after the rank cap).
    pub panels: usize,
    pub batches: usize,
    pub reconcile: ReconcileReport,
}

/// Collaborators and rendering settings for the per-key cycle.
///
/// Owned by exactly one worker; `run_cycle` takes `&mut self`, so two cycles
/// can never overlap on the same engine.
pub struct SyncEngine<S, C, P> {
    source: S,
    channel: C,
    store: P,
    layout: PageLayout,
    limits: BatchLimits,
}

impl<S, C, P> SyncEngine<S, C, P>
where
    S: LeaderboardSource,
    C: MessageChannel,
    P: PublishedStore,
{
    pub fn new(source: S, channel: C, store: P, layout: PageLayout, limits: BatchLimits) -> Self {
        Self {
            source,
            channel,
            store,
            layout,
            limits,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut P {
        &mut self.store
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn limits(&self) -> &BatchLimits {
        &self.limits
    }

    /// Fetch, render and reconcile `key`, stamping panels with the current time.
    pub async fn run_cycle(&mut self, key: &BoardKey) -> Result<CycleReport, CycleError> {
        self.run_cycle_at(key, Utc::now()).await
    }

    /// As [`run_cycle`](Self::run_cycle) with an explicit render timestamp.
    pub async fn run_cycle_at(
        &mut self,
        key: &BoardKey,
        rendered_at: DateTime<Utc>,
    ) -> Result<CycleReport, CycleError> {
        let payload = self.source.fetch(key).await?;
        let batches = lbs_board::render(&payload, &self.layout, &self.limits, rendered_at);
        let panels: usize = batches.iter().map(|b| b.len()).sum();
        debug!(
            key = %key,
            source = self.source.name(),
            members = payload.members.len(),
            panels,
            batches = batches.len(),
            "rendered leaderboard"
        );

        let reconcile = engine::reconcile(key, &batches, &self.channel, &mut self.store).await?;

        Ok(CycleReport {
            key: key.clone(),
            members: payload.members.len(),
            panels,
            batches: batches.len(),
            reconcile,
        })
    }

    /// Take the collaborators back.
    pub fn into_parts(self) -> (S, C, P) {
        (self.source, self.channel, self.store)
    }
}
