//! lbs-board
//!
//! Leaderboard snapshot -> ordered entries -> display panels -> message batches.
//!
//! Deterministic, pure logic. No IO. No network. No logging.
//! Callers fetch the payload and publish the batches.

pub mod batch;
pub mod member;
pub mod normalizer;
pub mod panel;

pub use batch::{pack, BatchLimits, MessageBatch};
pub use member::{DayState, Entry, LeaderboardPayload, PayloadError, RawMember};
pub use normalizer::normalize;
pub use panel::{paginate, GlyphSet, PageLayout, Panel, PanelField};

/// Number of puzzle days in one event. Rendering iterates `1..=DAYS_PER_EVENT`.
pub const DAYS_PER_EVENT: u32 = 25;

/// Entries rendered per panel.
pub const PAGE_SIZE: usize = 5;

/// Only the top `RANK_CAP` entries are ever rendered; the rest are dropped silently.
pub const RANK_CAP: usize = 200;

/// Serialized-size ceiling for one outbound message.
pub const MESSAGE_BYTE_BUDGET: usize = 6000;

/// Embeds accepted per webhook message.
pub const MAX_PANELS_PER_MESSAGE: usize = 10;

/// Convenience: payload -> batches with one layout and one set of limits.
///
/// `rendered_at` is stamped on every panel.
pub fn render(
    payload: &LeaderboardPayload,
    layout: &PageLayout,
    limits: &BatchLimits,
    rendered_at: chrono::DateTime<chrono::Utc>,
) -> Vec<MessageBatch> {
    let entries = normalize(payload);
    let panels = paginate(&entries, layout, rendered_at);
    pack(panels, limits)
}
