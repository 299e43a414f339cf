use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use tabview_engine::{BucketConfig, BucketSpec};

use crate::error::{Error, Result};

/// Where filtering happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Criteria are forwarded to the data source on every change.
    #[default]
    Server,
    /// The base record set is fetched once; criteria apply in memory.
    Client,
}

fn default_debounce_ms() -> u64 {
    375
}

fn default_page_limit() -> u32 {
    25
}

/// Per-view configuration. All fields have defaults so a partial TOML
/// file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default)]
    pub mode: FetchMode,
    /// Day-offset bucket boundaries; empty means the default
    /// overdue/today/upcoming split.
    #[serde(default)]
    pub buckets: Vec<BucketSpec>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            page_limit: default_page_limit(),
            mode: FetchMode::default(),
            buckets: Vec::new(),
        }
    }
}

impl ViewConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: ViewConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_limit == 0 {
            return Err(Error::Config("page_limit must be positive".into()));
        }
        self.bucket_config()?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn bucket_config(&self) -> Result<BucketConfig> {
        if self.buckets.is_empty() {
            return Ok(BucketConfig::default());
        }
        BucketConfig::new(self.buckets.clone()).map_err(Error::Types)
    }
}
