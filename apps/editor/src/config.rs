use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timing knobs for the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Period of the auto-save task.
    pub autosave_interval: Duration,
    /// Upper bound on any single persistence call, so a hung request always
    /// resolves to a reported failure.
    pub request_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Reads `RESUME_AUTOSAVE_INTERVAL_SECS` and `RESUME_REQUEST_TIMEOUT_SECS`,
    /// falling back to the defaults when unset.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            autosave_interval: secs_from_env(
                "RESUME_AUTOSAVE_INTERVAL_SECS",
                defaults.autosave_interval,
            )?,
            request_timeout: secs_from_env("RESUME_REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
        })
    }

    pub fn with_autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

fn secs_from_env(key: &str, default: Duration) -> Result<Duration> {
    match std::env::var(key) {
        Ok(raw) => {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{key} must be a whole number of seconds"))?;
            anyhow::ensure!(secs > 0, "{key} must be greater than zero");
            Ok(Duration::from_secs(secs))
        }
        Err(_) => Ok(default),
    }
}
