//! Meter configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options recognized by the orchestrator and label computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Omit the activation-id segment (and its separator) from computed
    /// labels. Useful when the downstream store treats every activation
    /// as a distinct series.
    pub ignore_activation_ids: bool,
}

impl MeterConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MeterConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
