use std::time::Duration;

use anyhow::ensure;
use tracing::trace;

use crate::monitors::Thresholds;

/// Monitor configuration
///
/// Every field has a default, so an empty JSON object is a valid file.
/// Thresholds are fixed in code and never read from the file.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Stats endpoint to poll
    #[serde(default = "default_url")]
    pub url: String,

    /// Seconds between two polls
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Seconds before a single request is abandoned
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(skip)]
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            interval: default_interval(),
            timeout: default_timeout(),
            thresholds: Thresholds::default(),
        }
    }
}

fn default_url() -> String {
    String::from("http://srv.msk01.gigacorp.local/_stats")
}

fn default_interval() -> u64 {
    10
}

fn default_timeout() -> u64 {
    30
}

/// Settings taken from the environment or the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub interval: Option<u64>,
    pub timeout: Option<u64>,
}

impl Config {
    /// Apply every override that is set, leaving the others untouched
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(url) = &overrides.url {
            self.url = url.clone();
        }
        if let Some(interval) = overrides.interval {
            self.interval = interval;
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.url.trim().is_empty(), "url must not be empty");
        ensure!(self.interval > 0, "interval must be greater than 0");
        ensure!(self.timeout > 0, "timeout must be greater than 0");
        Ok(())
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config| trace!("loaded config: {config:?}"))
}
