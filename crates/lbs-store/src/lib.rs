//! lbs-store
//!
//! Durable `key -> ordered message ids` mapping kept in one JSON file:
//!
//! ```json
//! { "2024": ["1310014068022575144", "1310014070019330188"] }
//! ```
//!
//! - Loading never fails: a missing, unreadable or unparsable file is an
//!   empty mapping.
//! - Every save rewrites the whole file through a temp file + rename, so a
//!   crash leaves either the old or the new mapping, never a torn one.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lbs_reconcile::{BoardKey, MessageId, PersistenceError, PublishedStore};
use tracing::{info, warn};

pub type StateMap = BTreeMap<String, Vec<MessageId>>;

/// File-backed [`PublishedStore`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: StateMap,
}

impl JsonFileStore {
    /// Load the mapping at `path`. Absent or corrupt files yield an empty store.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            match read_state(&path) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(path = %path.display(), error = %format!("{err:#}"), "state file unusable; starting empty");
                    StateMap::new()
                }
            }
        } else {
            info!(path = %path.display(), "no state file; starting empty");
            StateMap::new()
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &StateMap {
        &self.entries
    }

    pub fn keys(&self) -> Vec<BoardKey> {
        self.entries.keys().map(|k| BoardKey::new(k.as_str())).collect()
    }

    /// Drop `key` from the mapping. Returns whether it was present.
    pub fn remove(&mut self, key: &BoardKey) -> Result<bool, PersistenceError> {
        if !self.entries.contains_key(key.as_str()) {
            return Ok(false);
        }
        let mut next = self.entries.clone();
        next.remove(key.as_str());
        self.commit(next)?;
        Ok(true)
    }

    fn commit(&mut self, next: StateMap) -> Result<(), PersistenceError> {
        write_state(&self.path, &next).map_err(|err| PersistenceError {
            path: self.path.display().to_string(),
            message: format!("{err:#}"),
        })?;
        self.entries = next;
        Ok(())
    }
}

impl PublishedStore for JsonFileStore {
    fn published(&self, key: &BoardKey) -> Vec<MessageId> {
        self.entries.get(key.as_str()).cloned().unwrap_or_default()
    }

    fn save(&mut self, key: &BoardKey, ids: &[MessageId]) -> Result<(), PersistenceError> {
        let mut next = self.entries.clone();
        next.insert(key.as_str().to_string(), ids.to_vec());
        self.commit(next)
    }
}

fn read_state(path: &Path) -> Result<StateMap> {
    let raw = fs::read(path).with_context(|| format!("read state file {:?}", path))?;
    serde_json::from_slice(&raw).with_context(|| format!("parse state file {:?}", path))
}

fn write_state(path: &Path, entries: &StateMap) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create_dir_all {:?}", parent))?;
    }

    let json = serde_json::to_vec_pretty(entries).context("serialize state failed")?;
    let tmp = temporary_path(path);
    {
        let mut f = File::create(&tmp).with_context(|| format!("create {:?}", tmp))?;
        f.write_all(&json).with_context(|| format!("write {:?}", tmp))?;
        f.sync_all().with_context(|| format!("fsync {:?}", tmp))?;
    }
    fs::rename(&tmp, path).with_context(|| format!("rename {:?} -> {:?}", tmp, path))?;
    Ok(())
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let extension = path
        .extension()
        .map(|ext| format!("{}.tmp", ext.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    tmp.set_extension(extension);
    tmp
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
