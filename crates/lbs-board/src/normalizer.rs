//! Ranking of leaderboard members.
//!
//! Converts a [`LeaderboardPayload`] into a single ordered list of [`Entry`].
//! Ordering contract:
//! 1. members with at least one star, by score desc then stars desc;
//! 2. members with zero stars, by resolved name asc.
//!
//! Both sorts are stable, so equal keys keep document order.
//!
//! It does **not**:
//! - cap the list (that is `panel.rs`)
//! - render anything

use std::cmp::Reverse;

use crate::member::{Entry, LeaderboardPayload};

/// Produce the full ranked list. No entry is dropped.
pub fn normalize(payload: &LeaderboardPayload) -> Vec<Entry> {
    let (mut starred, mut unstarred): (Vec<Entry>, Vec<Entry>) = payload
        .members
        .iter()
        .map(Entry::from)
        .partition(|e| e.stars > 0);

    starred.sort_by_key(|e| (Reverse(e.score), Reverse(e.stars)));
    unstarred.sort_by_cached_key(Entry::sort_name);

    starred.extend(unstarred);
    starred
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
