//! Pagination of ranked entries into display panels.
//!
//! A [`Panel`] is one rendered page (serialized as a webhook embed) holding up
//! to `page_size` [`PanelField`]s, one per ranked entry. Truncation to the
//! rank cap happens by index, so the last capped rank is always rendered even
//! when its page is short.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::member::{DayState, Entry};
use crate::{DAYS_PER_EVENT, PAGE_SIZE, RANK_CAP};

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Glyph emitted per day, by completion state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlyphSet {
    pub not_started: String,
    pub part_one: String,
    pub both_parts: String,
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self {
            not_started: "<:star0:1310014068022575144>".to_string(),
            part_one: "<:star1:1310014070019330188>".to_string(),
            both_parts: "<:star2:1310014071579611231>".to_string(),
        }
    }
}

impl GlyphSet {
    pub fn glyph(&self, state: DayState) -> &str {
        match state {
            DayState::NotStarted => &self.not_started,
            DayState::PartOne => &self.part_one,
            DayState::BothParts => &self.both_parts,
        }
    }
}

/// Rendering parameters. Every field has a default, so a partial YAML
/// override deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Entries per panel. `0` is treated as `1`.
    pub page_size: usize,
    pub rank_cap: usize,
    /// Days rendered per entry, `1..=days`.
    pub days: u32,
    pub glyphs: GlyphSet,
    /// Embed side-bar color (RGB).
    pub color: u32,
    /// Page title prefix; the rank range is appended.
    pub heading: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            rank_cap: RANK_CAP,
            days: DAYS_PER_EVENT,
            glyphs: GlyphSet::default(),
            color: 0x00ff00,
            heading: "🎄 Advent of Code Leaderboard 🎄".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Rendered block for one entry at a fixed rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelField {
    #[serde(skip)]
    pub rank: usize,
    /// `"<rank>. <score> - <name>"`
    #[serde(rename = "name")]
    pub title: String,
    /// One glyph per day, no separators.
    #[serde(rename = "value")]
    pub body: String,
    pub inline: bool,
}

/// One page of ranked entries. Serializes to the embed object sent to the channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Panel {
    pub title: String,
    pub fields: Vec<PanelField>,
    /// RFC 3339 render time.
    pub timestamp: String,
    pub color: u32,
    #[serde(skip)]
    pub first_rank: usize,
    #[serde(skip)]
    pub last_rank: usize,
}

impl Panel {
    /// Serialized size in bytes; this is what the batcher budgets against.
    pub fn cost(&self) -> usize {
        // Plain strings and integers; serialization cannot fail. Treat a
        // failure as over any budget so the panel ends up alone.
        serde_json::to_vec(self).map_or(usize::MAX, |v| v.len())
    }
}

// ---------------------------------------------------------------------------
// Paginator
// ---------------------------------------------------------------------------

/// Render the day strip for one entry.
pub fn render_days(entry: &Entry, days: u32, glyphs: &GlyphSet) -> String {
    (1..=days).map(|d| glyphs.glyph(entry.day(d))).collect()
}

fn render_field(entry: &Entry, rank: usize, layout: &PageLayout) -> PanelField {
    PanelField {
        rank,
        title: format!("{}. {} - {}", rank, entry.score, entry.display_name()),
        body: render_days(entry, layout.days, &layout.glyphs),
        inline: false,
    }
}

/// Group ranked entries into panels of `layout.page_size`, rendering at most
/// `layout.rank_cap` entries. Returns one panel per non-empty page.
pub fn paginate(entries: &[Entry], layout: &PageLayout, rendered_at: DateTime<Utc>) -> Vec<Panel> {
    let page_size = layout.page_size.max(1);
    let limit = entries.len().min(layout.rank_cap);
    let timestamp = rendered_at.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut panels = Vec::with_capacity(limit.div_ceil(page_size));
    for start in (0..limit).step_by(page_size) {
        let end = (start + page_size).min(limit);
        let chunk = &entries[start..end];
        if chunk.is_empty() {
            continue;
        }

        let fields: Vec<PanelField> = chunk
            .iter()
            .enumerate()
            .map(|(pos, entry)| render_field(entry, start + pos + 1, layout))
            .collect();

        let first_rank = start + 1;
        let last_rank = start + chunk.len();
        panels.push(Panel {
            title: format!("{} (Top {}-{})", layout.heading, first_rank, last_rank),
            fields,
            timestamp: timestamp.clone(),
            color: layout.color,
            first_rank,
            last_rank,
        });
    }
    panels
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
