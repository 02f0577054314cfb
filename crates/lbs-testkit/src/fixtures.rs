use chrono::{DateTime, TimeZone, Utc};
use lbs_board::{
    render, BatchLimits, DayState, LeaderboardPayload, MessageBatch, PageLayout, RawMember,
    PAGE_SIZE,
};

/// Members per full panel with the default layout. With default glyphs a full
/// panel is well over half the message budget, so every full panel lands in
/// its own message.
pub const FULL_PAGE: usize = PAGE_SIZE;

/// Render timestamp used by scenarios (first puzzle unlock of 2024).
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 1, 5, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Starred member `id` with `score`; solved both parts of every day up to
/// `stars / 2` and part one of the next when `stars` is odd.
pub fn member(id: u64, name: &str, score: i64, stars: u32) -> RawMember {
    let mut m = RawMember::new(id, Some(name), score, stars);
    for day in 1..=stars / 2 {
        m = m.with_day(day, DayState::BothParts);
    }
    if stars % 2 == 1 {
        m = m.with_day(stars / 2 + 1, DayState::PartOne);
    }
    m
}

/// `n` starred members with strictly descending scores (member 1 ranks first).
pub fn payload_with_members(n: usize) -> LeaderboardPayload {
    let n = n as u64;
    let members = (1..=n)
        .map(|i| member(i, &format!("Elf {i}"), (1_000 - i) as i64, 50))
        .collect();
    LeaderboardPayload::new(members)
}

/// Render `payload` with default layout and limits at [`fixed_time`].
pub fn render_fixture(payload: &LeaderboardPayload) -> Vec<MessageBatch> {
    render(
        payload,
        &PageLayout::default(),
        &BatchLimits::default(),
        fixed_time(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_pages_map_one_to_one_onto_messages() {
        for pages in 1..=4 {
            let batches = render_fixture(&payload_with_members(pages * FULL_PAGE));
            assert_eq!(batches.len(), pages);
            assert!(batches.iter().all(|b| b.len() == 1));
        }
    }

    #[test]
    fn odd_stars_leave_a_half_day() {
        let m = member(1, "x", 1, 3);
        assert_eq!(m.completion_day_level.len(), 2);
        assert_eq!(m.completion_day_level["2"].len(), 1);
    }
}
