//! Command handler modules for the `lbs` CLI.
//!
//! Shared utilities used by multiple command paths live here.

pub mod once;
pub mod preview;
pub mod state;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load `.env` then `.env.local` if present; silent when absent.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let _ = dotenvy::from_filename(".env.local");
}

/// `--file`, else `MESSAGE_STORE_FILE` (after `.env`), else the default name.
pub fn resolve_store_file(file: Option<PathBuf>) -> PathBuf {
    if let Some(f) = file {
        return f;
    }
    load_dotenv();
    std::env::var(lbs_config::ENV_STORE_FILE)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(lbs_config::DEFAULT_STORE_FILE))
}

/// Read a JSON file, tolerating a UTF-8 BOM.
pub fn read_json_bytes(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path).with_context(|| format!("read failed: {}", path.display()))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    Ok(bytes.to_vec())
}
