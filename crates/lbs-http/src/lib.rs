//! lbs-http
//!
//! reqwest-backed collaborators for the sync cycle:
//! - [`AocClient`]: private leaderboard JSON ([`lbs_reconcile::LeaderboardSource`]).
//! - [`WebhookChannel`]: webhook message create/edit/delete
//!   ([`lbs_reconcile::MessageChannel`]).
//!
//! Credentials are passed in by the caller and never logged.

use std::time::Duration;

mod aoc;
mod webhook;

pub use aoc::{AocClient, DEFAULT_AOC_BASE_URL};
pub use webhook::{WebhookChannel, WebhookIdentity, DEFAULT_AVATAR_URL, DEFAULT_USERNAME};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const USER_AGENT: &str = concat!(
    "lbs/",
    env!("CARGO_PKG_VERSION"),
    " (private leaderboard sync)"
);

/// Error bodies are carried into error values; keep them short.
const MAX_ERROR_BODY_CHARS: usize = 512;

async fn error_body(resp: reqwest::Response) -> String {
    match resp.text().await {
        Ok(body) if body.chars().count() > MAX_ERROR_BODY_CHARS => {
            let mut short: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            short.push_str("...");
            short
        }
        Ok(body) => body,
        Err(e) => format!("<unreadable body: {e}>"),
    }
}
