//! Configuration file support for argus-reach.
//!
//! Provides YAML-based configuration through `argus-reach.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::application::dto::OutputFormat;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "argus-reach.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<OutputFormat>,
    pub repo: Option<String>,
    pub build_id: Option<String>,
    pub analysis_version: Option<String>,
    pub fail_on_reachable: Option<bool>,
    pub include_edges: Option<bool>,
    pub ignore_findings: Option<Vec<IgnoreFinding>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Ids listed under `ignore_findings`
    pub fn ignored_ids(&self) -> Vec<String> {
        self.ignore_findings
            .iter()
            .flatten()
            .map(|entry| entry.id.trim().to_string())
            .collect()
    }
}

/// A finding accepted as a known risk and excluded from analysis.
#[derive(Debug, Deserialize)]
pub struct IgnoreFinding {
    pub id: String,
    pub reason: Option<String>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    // an empty file deserializes to unit, not to an empty mapping
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML and `format` is json or markdown.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    load_config_from_path(&config_path).map(Some)
}

fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref ignore_findings) = config.ignore_findings {
        for (i, entry) in ignore_findings.iter().enumerate() {
            if entry.id.trim().is_empty() {
                bail!(
                    "Invalid config: ignore_findings[{}].id must not be empty.\n\n\
                     💡 Hint: Each ignore_findings entry needs a non-empty 'id' (e.g., \"GHSA-p6mc-m468-83gw\").",
                    i
                );
            }
        }
    }

    for (field, value) in [
        ("repo", &config.repo),
        ("build_id", &config.build_id),
        ("analysis_version", &config.analysis_version),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            bail!("Invalid config: {} must not be empty when set.", field);
        }
    }
    Ok(())
}

fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
