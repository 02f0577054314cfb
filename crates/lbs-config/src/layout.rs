//! Optional YAML override for rendering and posting identity.
//!
//! ```yaml
//! layout:
//!   page_size: 5
//!   rank_cap: 200
//!   glyphs:
//!     both_parts: ":star:"
//! limits:
//!   max_bytes: 6000
//! username: "Leaderboard"
//! avatar_url: "https://example.com/a.png"
//! ```
//!
//! Every key is optional. Unknown keys are rejected so typos do not silently
//! fall back to defaults.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use lbs_board::{BatchLimits, PageLayout};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSettings {
    pub layout: PageLayout,
    pub limits: BatchLimits,
    /// Webhook display name; `None` keeps the built-in name.
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

impl LayoutSettings {
    pub fn from_yaml_str(doc: &str) -> Result<Self> {
        if doc.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_yaml::from_str(doc).context("layout yaml parse failed")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let doc = fs::read_to_string(path)
            .with_context(|| format!("read layout file failed: {}", path.display()))?;
        Self::from_yaml_str(&doc).with_context(|| format!("layout file {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        if self.layout.page_size == 0 {
            bail!("CONFIG_INVALID layout.page_size must be >= 1");
        }
        if self.layout.rank_cap == 0 {
            bail!("CONFIG_INVALID layout.rank_cap must be >= 1");
        }
        if self.layout.days == 0 {
            bail!("CONFIG_INVALID layout.days must be >= 1");
        }
        if self.layout.color > 0xff_ffff {
            bail!("CONFIG_INVALID layout.color must be a 24-bit RGB value");
        }
        if self.limits.max_bytes == 0 || self.limits.max_panels == 0 {
            bail!("CONFIG_INVALID limits.max_bytes and limits.max_panels must be >= 1");
        }
        if matches!(self.username.as_deref(), Some(u) if u.trim().is_empty()) {
            bail!("CONFIG_INVALID username must not be blank");
        }
        Ok(())
    }
}
