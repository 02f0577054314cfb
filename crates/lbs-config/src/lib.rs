//! lbs-config
//!
//! Runtime configuration, resolved once at startup from environment variables
//! (optionally bootstrapped from `.env` by the binaries) and passed into
//! constructors. Nothing else in the workspace reads the environment.
//!
//! | Variable               | Required | Default                 |
//! |------------------------|----------|-------------------------|
//! | `AOC_SESSION_COOKIE`   | yes      |                         |
//! | `AOC_LEADERBOARD_ID`   | yes      |                         |
//! | `DISCORD_WEBHOOK_URL`  | yes      |                         |
//! | `AOC_BASE_URL`         | no       | `https://adventofcode.com` |
//! | `AOC_LEADERBOARD_YEAR` | no       | `2024`                  |
//! | `MESSAGE_STORE_FILE`   | no       | `discord_messages.json` |
//! | `UPDATE_INTERVAL`      | no       | `900` (seconds)         |
//! | `ERROR_BACKOFF`        | no       | `60` (seconds)          |
//! | `HTTP_TIMEOUT`         | no       | `30` (seconds)          |
//! | `LOG_FILE`             | no       | `bot.log`, empty disables |
//! | `LBS_LAYOUT_FILE`      | no       | built-in layout         |
//! | `LBS_DAEMON_ADDR`      | no       | status API disabled     |

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub mod layout;
pub mod secrets;

pub use layout::LayoutSettings;
pub use secrets::{SessionCookie, WebhookUrl};

pub const ENV_SESSION_COOKIE: &str = "AOC_SESSION_COOKIE";
pub const ENV_LEADERBOARD_ID: &str = "AOC_LEADERBOARD_ID";
pub const ENV_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
pub const ENV_BASE_URL: &str = "AOC_BASE_URL";
pub const ENV_YEAR: &str = "AOC_LEADERBOARD_YEAR";
pub const ENV_STORE_FILE: &str = "MESSAGE_STORE_FILE";
pub const ENV_UPDATE_INTERVAL: &str = "UPDATE_INTERVAL";
pub const ENV_ERROR_BACKOFF: &str = "ERROR_BACKOFF";
pub const ENV_HTTP_TIMEOUT: &str = "HTTP_TIMEOUT";
pub const ENV_LOG_FILE: &str = "LOG_FILE";
pub const ENV_LAYOUT_FILE: &str = "LBS_LAYOUT_FILE";
pub const ENV_DAEMON_ADDR: &str = "LBS_DAEMON_ADDR";

pub const DEFAULT_BASE_URL: &str = "https://adventofcode.com";
pub const DEFAULT_YEAR: u16 = 2024;
pub const DEFAULT_STORE_FILE: &str = "discord_messages.json";
pub const DEFAULT_UPDATE_INTERVAL_SECS: u64 = 900;
pub const DEFAULT_ERROR_BACKOFF_SECS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILE: &str = "bot.log";

/// First contest year; earlier years have no leaderboards.
pub const FIRST_EVENT_YEAR: u16 = 2015;

/// Fully resolved settings. Secret-bearing fields redact themselves in `Debug`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub session_cookie: SessionCookie,
    pub leaderboard_id: String,
    pub webhook: WebhookUrl,
    pub aoc_base_url: String,
    pub year: u16,
    pub store_file: PathBuf,
    pub update_interval: Duration,
    pub error_backoff: Duration,
    pub http_timeout: Duration,
    pub log_file: Option<PathBuf>,
    pub layout: LayoutSettings,
    pub daemon_addr: Option<SocketAddr>,
}

impl AppConfig {
    /// Resolve from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve through `lookup` (name -> raw value). Blank values count as
    /// unset. All missing required variables are reported in one error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Option<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let session_cookie = get(ENV_SESSION_COOKIE);
        let leaderboard_id = get(ENV_LEADERBOARD_ID);
        let webhook_raw = get(ENV_WEBHOOK_URL);

        let mut missing = Vec::new();
        if session_cookie.is_none() {
            missing.push(ENV_SESSION_COOKIE);
        }
        if leaderboard_id.is_none() {
            missing.push(ENV_LEADERBOARD_ID);
        }
        if webhook_raw.is_none() {
            missing.push(ENV_WEBHOOK_URL);
        }
        let (Some(session_cookie), Some(leaderboard_id), Some(webhook_raw)) =
            (session_cookie, leaderboard_id, webhook_raw)
        else {
            bail!(
                "CONFIG_MISSING: required environment variables not set: {}\n\
                 Please check your .env file",
                missing.join(", ")
            );
        };

        let webhook = WebhookUrl::parse(&webhook_raw)?;

        let year = match get(ENV_YEAR) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("CONFIG_INVALID {ENV_YEAR}: '{raw}' is not a year"))?,
            None => DEFAULT_YEAR,
        };
        if year < FIRST_EVENT_YEAR {
            bail!("CONFIG_INVALID {ENV_YEAR}: {year} is before the first event ({FIRST_EVENT_YEAR})");
        }

        let update_interval = seconds(&get, ENV_UPDATE_INTERVAL, DEFAULT_UPDATE_INTERVAL_SECS)?;
        if update_interval.is_zero() {
            bail!("CONFIG_INVALID {ENV_UPDATE_INTERVAL}: must be > 0");
        }
        let error_backoff = seconds(&get, ENV_ERROR_BACKOFF, DEFAULT_ERROR_BACKOFF_SECS)?;
        let http_timeout = seconds(&get, ENV_HTTP_TIMEOUT, DEFAULT_HTTP_TIMEOUT_SECS)?;
        if http_timeout.is_zero() {
            bail!("CONFIG_INVALID {ENV_HTTP_TIMEOUT}: must be > 0");
        }

        // LOG_FILE set to an empty string disables the file sink.
        let log_file = match lookup(ENV_LOG_FILE) {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(PathBuf::from(raw.trim())),
            None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        };

        let layout = match get(ENV_LAYOUT_FILE) {
            Some(path) => LayoutSettings::load(Path::new(&path))?,
            None => LayoutSettings::default(),
        };

        let daemon_addr = get(ENV_DAEMON_ADDR)
            .map(|raw| {
                raw.parse::<SocketAddr>()
                    .with_context(|| format!("CONFIG_INVALID {ENV_DAEMON_ADDR}: '{raw}'"))
            })
            .transpose()?;

        Ok(Self {
            session_cookie: SessionCookie::new(session_cookie),
            leaderboard_id,
            webhook,
            aoc_base_url: get(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            year,
            store_file: PathBuf::from(
                get(ENV_STORE_FILE).unwrap_or_else(|| DEFAULT_STORE_FILE.to_string()),
            ),
            update_interval,
            error_backoff,
            http_timeout,
            log_file,
            layout,
            daemon_addr,
        })
    }
}

fn seconds<G>(get: &G, name: &str, default: u64) -> Result<Duration>
where
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        Some(raw) => {
            let secs = raw
                .parse::<u64>()
                .with_context(|| format!("CONFIG_INVALID {name}: '{raw}' is not a whole number of seconds"))?;
            Ok(Duration::from_secs(secs))
        }
        None => Ok(Duration::from_secs(default)),
    }
}
