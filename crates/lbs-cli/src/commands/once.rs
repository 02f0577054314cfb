use anyhow::{bail, Context, Result};
use lbs_config::{AppConfig, FIRST_EVENT_YEAR};
use lbs_daemon::wiring::{board_key, build_engine, init_tracing};

use super::load_dotenv;

/// One fetch -> render -> reconcile pass against the live services.
pub async fn run_once(year: Option<u16>) -> Result<()> {
    load_dotenv();
    let mut cfg = AppConfig::from_env()?;
    if let Some(y) = year {
        if y < FIRST_EVENT_YEAR {
            bail!("--year {y} is before the first event ({FIRST_EVENT_YEAR})");
        }
        cfg.year = y;
    }
    init_tracing(cfg.log_file.as_deref())?;

    let key = board_key(&cfg);
    let mut engine = build_engine(&cfg)?;
    let report = engine
        .run_cycle(&key)
        .await
        .with_context(|| format!("sync cycle failed for key={key}"))?;

    println!("key={}", report.key);
    println!("members={}", report.members);
    println!("panels={}", report.panels);
    println!("messages={}", report.batches);
    println!("created={}", report.reconcile.created.len());
    println!("updated={}", report.reconcile.updated);
    println!("deleted={}", report.reconcile.deleted);
    println!("already_gone={}", report.reconcile.already_gone);
    println!("published={}", report.reconcile.published.len());
    Ok(())
}
