// File: src/config.rs
// Purpose: Form behaviour configuration, loadable from rusty-forms.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Form configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FormConfig {
    #[serde(default)]
    pub revalidation: RevalidationConfig,

    #[serde(default)]
    pub recheck: RecheckConfig,
}

/// How a field is revalidated when a sibling it depends on changes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevalidationConfig {
    /// Whether the dependent's revalidation is announced as a change of its
    /// own (notifying its subscribers and its own dependents). Off by default.
    #[serde(default = "default_false")]
    pub emit_event: bool,
}

/// Deferred rechecks for fields validated before they had a parent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecheckConfig {
    /// Drain the recheck queue at the end of every attaching operation.
    /// When off, call `FormGroup::flush_pending` yourself.
    #[serde(default = "default_true")]
    pub auto_flush: bool,
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for RevalidationConfig {
    fn default() -> Self {
        Self { emit_event: false }
    }
}

impl Default for RecheckConfig {
    fn default() -> Self {
        Self { auto_flush: true }
    }
}

impl FormConfig {
    /// Load configuration from a TOML file. A missing or empty file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from ./rusty-forms.toml
    pub fn load_default() -> Result<Self> {
        Self::load("rusty-forms.toml")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = toml::from_str(content)?;
        Ok(config)
    }

    /// Defaults with the recheck queue left for the caller to drain.
    pub fn manual_flush() -> Self {
        Self {
            recheck: RecheckConfig { auto_flush: false },
            ..Self::default()
        }
    }
}
