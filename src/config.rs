//! TOML configuration for the daemon.
//!
//! One file describes every watched domain. Loading validates the whole
//! file up front so a bad watch entry fails at startup instead of inside a
//! monitor thread hours later.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::validation::validate_id;

const DEFAULT_ID_FIELD: &str = "id";
const DEFAULT_INTERVAL_SECS: u64 = 3600;

/// Starter file written by `vigil init`.
pub const STARTER_CONFIG: &str = r#"# vigil configuration
#
# Snapshots are stored under data_dir/<watch name> unless a watch sets its
# own snapshot_dir. Without data_dir the platform data directory is used.
# data_dir = "/var/lib/vigil"

[[watch]]
name = "jobs"
url = "https://example.com/api/jobs"
# Field holding each record's identity (string or number). Default: "id".
# id_field = "id"
# Seconds between fetches. Default: 3600.
interval_secs = 900
# Records mentioning any of these words are flagged in reports.
# highlight = ["senior", "remote"]
"#;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Base directory for snapshot stores. Defaults to the platform data
    /// directory when absent.
    pub data_dir: Option<PathBuf>,
    #[serde(default, rename = "watch")]
    pub watches: Vec<WatchConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchConfig {
    pub name: String,
    pub url: String,
    #[serde(default = "default_id_field")]
    pub id_field: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Overrides the derived `<data_dir>/<name>` location.
    pub snapshot_dir: Option<PathBuf>,
    #[serde(default)]
    pub highlight: Vec<String>,
}

fn default_id_field() -> String {
    DEFAULT_ID_FIELD.to_string()
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.watches.is_empty() {
            bail!("config defines no [[watch]] entries; nothing to monitor");
        }

        let mut seen = BTreeSet::new();
        for watch in &self.watches {
            validate_id(&watch.name)
                .with_context(|| format!("invalid watch name '{}'", watch.name))?;
            if !seen.insert(watch.name.as_str()) {
                bail!("duplicate watch name '{}'", watch.name);
            }
            if watch.url.trim().is_empty() {
                bail!("watch '{}' has an empty url", watch.name);
            }
            if watch.interval_secs == 0 {
                bail!("watch '{}': interval_secs must be at least 1", watch.name);
            }
            if watch.id_field.trim().is_empty() {
                bail!("watch '{}' has an empty id_field", watch.name);
            }
        }
        Ok(())
    }

    /// Resolve the snapshot directory for one watch.
    pub fn snapshot_dir(&self, watch: &WatchConfig) -> Result<PathBuf> {
        if let Some(dir) = &watch.snapshot_dir {
            return Ok(dir.clone());
        }
        let base = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .context("no platform data directory available; set data_dir in the config")?
                .join("vigil"),
        };
        Ok(base.join(&watch.name))
    }
}

impl WatchConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
