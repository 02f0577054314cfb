//! Offline rendering of a saved leaderboard document.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use lbs_board::{render, LeaderboardPayload};
use lbs_config::LayoutSettings;
use serde_json::json;

use super::read_json_bytes;

pub fn preview(payload: &Path, layout: Option<&Path>, at: Option<&str>, json: bool) -> Result<()> {
    let bytes = read_json_bytes(payload)?;
    let doc = LeaderboardPayload::from_slice(&bytes)
        .with_context(|| format!("payload decode failed: {}", payload.display()))?;

    let settings = match layout {
        Some(path) => LayoutSettings::load(path)?,
        None => LayoutSettings::default(),
    };

    let rendered_at = match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("--at is not RFC 3339: '{raw}'"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let batches = render(&doc, &settings.layout, &settings.limits, rendered_at);

    if json {
        let bodies: Vec<_> = batches
            .iter()
            .map(|b| json!({ "embeds": b.panels() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&bodies)?);
        return Ok(());
    }

    let panels: usize = batches.iter().map(|b| b.len()).sum();
    println!("members={}", doc.members.len());
    println!("panels={panels}");
    println!("messages={}", batches.len());
    for (i, batch) in batches.iter().enumerate() {
        let ranks = match batch.rank_range() {
            Some((first, last)) => format!("{first}-{last}"),
            None => "-".to_string(),
        };
        println!(
            "message={} panels={} bytes={} ranks={}",
            i + 1,
            batch.len(),
            batch.cost(),
            ranks
        );
    }
    Ok(())
}
