//! Monitor configuration.
//!
//! Values come from an optional TOML file:
//!
//! ```toml
//! process_name = "Phasmophobia.exe"
//! refresh_interval_secs = 30
//! definitions_path = "pointers.xml"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;

pub const DEFAULT_PROCESS_NAME: &str = "Phasmophobia.exe";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_DEFINITIONS_PATH: &str = "pointers.xml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Executable name of the target, matched case-insensitively
    pub process_name: String,
    /// Seconds between poll cycles
    pub refresh_interval_secs: u64,
    /// Cheat table holding the pointer chains
    pub definitions_path: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            definitions_path: PathBuf::from(DEFAULT_DEFINITIONS_PATH),
        }
    }
}

impl MonitorConfig {
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Wait between cycles, never shorter than one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

/// Builder for MonitorConfig
#[derive(Debug, Clone, Default)]
pub struct MonitorConfigBuilder {
    base: Option<MonitorConfig>,
    process_name: Option<String>,
    refresh_interval_secs: Option<u64>,
    definitions_path: Option<PathBuf>,
}

impl MonitorConfigBuilder {
    /// Start from an existing configuration instead of the defaults
    pub fn base(mut self, config: MonitorConfig) -> Self {
        self.base = Some(config);
        self
    }

    pub fn process_name<S: Into<String>>(mut self, name: S) -> Self {
        self.process_name = Some(name.into());
        self
    }

    pub fn refresh_interval_secs(mut self, secs: u64) -> Self {
        self.refresh_interval_secs = Some(secs);
        self
    }

    pub fn definitions_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.definitions_path = Some(path.into());
        self
    }

    pub fn build(self) -> MonitorConfig {
        let base = self.base.unwrap_or_default();
        MonitorConfig {
            process_name: self.process_name.unwrap_or(base.process_name),
            refresh_interval_secs: self
                .refresh_interval_secs
                .unwrap_or(base.refresh_interval_secs),
            definitions_path: self.definitions_path.unwrap_or(base.definitions_path),
        }
    }
}
