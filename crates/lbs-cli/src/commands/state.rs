//! `lbs state show|clear`: operator access to the persisted id lists.

use std::path::PathBuf;

use anyhow::{Context, Result};
use lbs_reconcile::BoardKey;
use lbs_store::JsonFileStore;

use super::resolve_store_file;

pub fn show(file: Option<PathBuf>) -> Result<()> {
    let path = resolve_store_file(file);
    let store = JsonFileStore::load(&path);

    println!("file={}", path.display());
    println!("keys={}", store.entries().len());
    for (key, ids) in store.entries() {
        let joined: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        println!("key={key} count={} ids={}", ids.len(), joined.join(","));
    }
    Ok(())
}

/// Drops the key from the file. Messages already on the channel are not
/// touched; the next cycle for that key publishes a fresh set.
pub fn clear(key: &str, file: Option<PathBuf>) -> Result<()> {
    let path = resolve_store_file(file);
    let mut store = JsonFileStore::load(&path);
    let key = BoardKey::from(key);

    let removed = store
        .remove(&key)
        .with_context(|| format!("clear failed for key={key}"))?;

    println!("file={}", path.display());
    println!("key={key}");
    println!("removed={removed}");
    Ok(())
}
