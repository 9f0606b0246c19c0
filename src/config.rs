//! Runtime settings.
//!
//! Layered lowest to highest: built-in defaults, an optional config file
//! (any format the `config` crate understands), then `HEALWATCH_*`
//! environment variables. Command-line flags are applied on top by the
//! binary before [`Settings::validate`] runs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::scheduler::Cadence;

pub const DEFAULT_API_URL: &str = "http://localhost:5001";
pub const DEFAULT_TARGET_URL: &str = "http://localhost:5000";

/// Console settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Base URL of the reporting API.
    pub api_url: String,
    /// Base URL of the observed target.
    pub target_url: String,
    pub poll_interval_ms: u64,
    pub probe_interval_ms: u64,
    /// Transport deadline for every request. Unset means none.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    /// Where to write diagnostics. Unset disables logging.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            target_url: DEFAULT_TARGET_URL.to_string(),
            poll_interval_ms: 1000,
            probe_interval_ms: 2000,
            request_timeout_ms: None,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from defaults, `file` (if any) and the environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(file, Environment::with_prefix("HEALWATCH"))
    }

    fn load_with_env(file: Option<&Path>, env: Environment) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("target_url", defaults.target_url)?
            .set_default("poll_interval_ms", defaults.poll_interval_ms as i64)?
            .set_default("probe_interval_ms", defaults.probe_interval_ms as i64)?;

        if let Some(path) = file {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(env.try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let mut settings: Settings = config
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check and normalise the settings in place.
    pub fn validate(&mut self) -> Result<()> {
        self.api_url = check_url("api_url", &self.api_url)?;
        self.target_url = check_url("target_url", &self.target_url)?;

        if self.poll_interval_ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        if self.probe_interval_ms == 0 {
            bail!("probe_interval_ms must be greater than zero");
        }
        if self.request_timeout_ms == Some(0) {
            bail!("request_timeout_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn cadence(&self) -> Cadence {
        Cadence {
            poll: Duration::from_millis(self.poll_interval_ms),
            probe: Duration::from_millis(self.probe_interval_ms),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn check_url(key: &str, raw: &str) -> Result<String> {
    let url = raw.trim().trim_end_matches('/');
    if url.is_empty() {
        bail!("{} must not be empty", key);
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!("{} must be an http(s) URL, got '{}'", key, raw);
    }
    Ok(url.to_string())
}
