//! Retriever configuration.
//!
//! Loaded from the JSON file named by `RETRIEVE_CONFIG` (if set), then
//! overridden field by field from `RETRIEVE_*` environment variables.

use crate::error::{Result, RetrieveError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "RETRIEVE_CONFIG";
pub const STRICT_ENV: &str = "RETRIEVE_STRICT";
pub const PARALLEL_INGEST_ENV: &str = "RETRIEVE_PARALLEL_INGEST";
pub const RETAIN_VIEWS_ENV: &str = "RETRIEVE_RETAIN_VIEWS";
pub const LOG_DIR_ENV: &str = "RETRIEVE_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrieverConfig {
    /// Reject queries for types outside any retrievable lineage instead of
    /// answering them with an empty result.
    pub strict: bool,
    /// Derive module contributions on the rayon pool.
    pub parallel_ingest: bool,
    /// Keep flattened views strongly referenced between queries. When false
    /// the views live only as long as some caller holds them.
    pub retain_views: bool,
    pub log_dir: Option<PathBuf>,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            strict: false,
            parallel_ingest: true,
            retain_views: true,
            log_dir: None,
        }
    }
}

impl RetrieverConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Defaults, then the config file, then environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup(STRICT_ENV) {
            self.strict = parse_flag(STRICT_ENV, &v)?;
        }
        if let Some(v) = lookup(PARALLEL_INGEST_ENV) {
            self.parallel_ingest = parse_flag(PARALLEL_INGEST_ENV, &v)?;
        }
        if let Some(v) = lookup(RETAIN_VIEWS_ENV) {
            self.retain_views = parse_flag(RETAIN_VIEWS_ENV, &v)?;
        }
        if let Some(v) = lookup(LOG_DIR_ENV) {
            self.log_dir = Some(PathBuf::from(v));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RetrieveError::Config(format!(
            "{key}: expected a boolean, got '{other}'"
        ))),
    }
}
