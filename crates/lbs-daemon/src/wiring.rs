//! Production wiring: config -> concrete collaborators, and logging setup.
//!
//! Shared by the daemon binary and `lbs once`.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use lbs_config::AppConfig;
use lbs_http::{AocClient, WebhookChannel, WebhookIdentity};
use lbs_reconcile::{BoardKey, SyncEngine};
use lbs_store::JsonFileStore;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub type LiveEngine = SyncEngine<AocClient, WebhookChannel, JsonFileStore>;

pub fn board_key(cfg: &AppConfig) -> BoardKey {
    BoardKey::from(cfg.year)
}

/// Build the HTTP clients and load the state file named by `cfg`.
pub fn build_engine(cfg: &AppConfig) -> Result<LiveEngine> {
    let source = AocClient::new(
        cfg.aoc_base_url.as_str(),
        cfg.leaderboard_id.as_str(),
        cfg.session_cookie.expose(),
        cfg.http_timeout,
    )
    .context("build leaderboard client failed")?;

    let identity =
        WebhookIdentity::with_overrides(cfg.layout.username.clone(), cfg.layout.avatar_url.clone());
    let channel = WebhookChannel::new(cfg.webhook.expose(), identity, cfg.http_timeout)
        .context("build webhook client failed")?;

    let store = JsonFileStore::load(&cfg.store_file);
    info!(
        store = %cfg.store_file.display(),
        webhook_id = cfg.webhook.id(),
        leaderboard_id = %cfg.leaderboard_id,
        year = cfg.year,
        "collaborators ready"
    );

    Ok(SyncEngine::new(
        source,
        channel,
        store,
        cfg.layout.layout.clone(),
        cfg.layout.limits,
    ))
}

/// Stdout logging filtered by `RUST_LOG` (default `info`), mirrored into
/// `log_file` (appended, no ANSI colors) when given.
pub fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file failed: {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber failed")?;
    Ok(())
}
