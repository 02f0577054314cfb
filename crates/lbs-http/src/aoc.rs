use std::fmt;
use std::time::Duration;

use lbs_board::LeaderboardPayload;
use lbs_reconcile::{BoardKey, FetchError, LeaderboardSource};
use reqwest::header::COOKIE;
use tracing::debug;

use crate::{error_body, USER_AGENT};

pub const DEFAULT_AOC_BASE_URL: &str = "https://adventofcode.com";

/// Private leaderboard reader.
///
/// Redirects are not followed: an expired session answers with a redirect to
/// the login page, which must surface as a status error rather than an HTML
/// decode failure.
#[derive(Clone)]
pub struct AocClient {
    http: reqwest::Client,
    base_url: String,
    leaderboard_id: String,
    session_cookie: String,
}

impl fmt::Debug for AocClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AocClient")
            .field("base_url", &self.base_url)
            .field("leaderboard_id", &self.leaderboard_id)
            .field("session_cookie", &"<REDACTED>")
            .finish()
    }
}

impl AocClient {
    pub fn new(
        base_url: impl Into<String>,
        leaderboard_id: impl Into<String>,
        session_cookie: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            leaderboard_id: leaderboard_id.into(),
            session_cookie: session_cookie.into(),
        })
    }

    pub fn leaderboard_url(&self, key: &BoardKey) -> String {
        format!(
            "{}/{}/leaderboard/private/view/{}.json",
            self.base_url.trim_end_matches('/'),
            key,
            self.leaderboard_id
        )
    }
}

#[async_trait::async_trait]
impl LeaderboardSource for AocClient {
    fn name(&self) -> &'static str {
        "adventofcode"
    }

    async fn fetch(&self, key: &BoardKey) -> Result<LeaderboardPayload, FetchError> {
        let url = self.leaderboard_url(key);
        debug!(%url, "fetching leaderboard");

        let resp = self
            .http
            .get(&url)
            .header(COOKIE, format!("session={}", self.session_cookie))
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: error_body(resp).await,
            });
        }

        let raw = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(LeaderboardPayload::from_slice(&raw)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
