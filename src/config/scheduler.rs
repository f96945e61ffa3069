//! Scheduler configuration structures.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, SchedulerError, DEFAULT_SCHEDULER_NAME};

/// Environment variable holding the scheduler name.
pub const ENV_NAME: &str = "TASK_QUEUE_NAME";
/// Environment variable holding the scheduler capacity.
pub const ENV_CAPACITY: &str = "TASK_QUEUE_CAPACITY";

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Name used in logs and audit events.
    pub name: String,
    /// Maximum number of concurrently running tasks.
    pub capacity: usize,
}

impl Default for SchedulerConfig {
    /// One slot per logical CPU.
    fn default() -> Self {
        Self {
            name: DEFAULT_SCHEDULER_NAME.to_string(),
            capacity: num_cpus::get(),
        }
    }
}

impl SchedulerConfig {
    /// Create a configuration with the given capacity and the default name.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Set the scheduler name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::Config` on malformed JSON or invalid values.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| SchedulerError::Config(format!("parse error: {e}")))?;
        cfg.validate().map_err(SchedulerError::Config)?;
        Ok(cfg)
    }

    /// Read and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not hold a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scheduler config {}", path.display()))?;
        let cfg = Self::from_json_str(&raw)
            .with_context(|| format!("loading scheduler config {}", path.display()))?;
        Ok(cfg)
    }

    /// Build configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Unset variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Fails if `TASK_QUEUE_CAPACITY` is not a number or the result is invalid.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut cfg = Self::default();
        if let Some(name) = lookup(ENV_NAME) {
            cfg.name = name;
        }
        if let Some(raw) = lookup(ENV_CAPACITY) {
            cfg.capacity = raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{ENV_CAPACITY}={raw:?} is not a valid capacity"))?;
        }
        cfg.validate()
            .map_err(SchedulerError::Config)
            .context("invalid scheduler config from environment")?;
        Ok(cfg)
    }
}
