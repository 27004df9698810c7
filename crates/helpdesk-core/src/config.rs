//! Engine configuration.
//!
//! A small TOML file controls the optional notification paths:
//!
//! ```toml
//! [notifications]
//! notify_watchers = false
//!
//! [escalation]
//! enabled = true
//! ```
//!
//! Every field has a default, so an absent file or empty table is valid.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub notifications: NotificationsConfig,
    pub escalation: EscalationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Notify category watchers on status changes.
    pub notify_watchers: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    /// Notify the assignee and the admin-pool contact when priority
    /// reaches urgent.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

const fn default_true() -> bool {
    true
}

impl EngineConfig {
    /// Parse a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error when the TOML is malformed or has unexpected types.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parse engine config")
    }

    /// Load from a file; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read engine config at {}", path.display()))?;
        Self::from_toml_str(&raw)
    }
}
