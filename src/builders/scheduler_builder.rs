//! Builder for [`Scheduler`] instances.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::core::{AuditSink, Scheduler, SchedulerError, Spawn};
use crate::runtime::TokioSpawner;

/// Step-by-step construction of a [`Scheduler`].
///
/// ```rust,ignore
/// let scheduler = SchedulerBuilder::from_config(&SchedulerConfig::from_env()?)
///     .audit(InMemoryAuditSink::new(1024))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    audit: Option<Arc<dyn AuditSink>>,
}

impl SchedulerBuilder {
    /// Start from a capacity with default name.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::from_config(&SchedulerConfig::with_capacity(capacity))
    }

    /// Start from an existing configuration.
    #[must_use]
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self {
            config: config.clone(),
            audit: None,
        }
    }

    /// Set the scheduler name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn audit(mut self, sink: impl AuditSink + 'static) -> Self {
        self.audit = Some(Arc::new(sink));
        self
    }

    /// Configuration the builder will apply.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build a scheduler on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or outside a tokio runtime.
    pub fn build(self) -> Result<Scheduler<TokioSpawner>, SchedulerError> {
        let spawner = TokioSpawner::current()?;
        self.build_with_spawner(spawner)
    }

    /// Build a scheduler on a custom spawner.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration.
    pub fn build_with_spawner<S>(self, spawner: S) -> Result<Scheduler<S>, SchedulerError>
    where
        S: Spawn + Clone + Send + Sync + 'static,
    {
        if self.config.capacity == 0 {
            return Err(SchedulerError::InvalidCapacity(0));
        }
        self.config.validate().map_err(SchedulerError::Config)?;
        Scheduler::from_parts(self.config.name, self.config.capacity, spawner, self.audit)
    }
}

impl std::fmt::Debug for SchedulerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerBuilder")
            .field("config", &self.config)
            .field("audit", &self.audit.is_some())
            .finish()
    }
}

/// Build one scheduler per configuration, keyed by name, sharing a spawner.
///
/// # Errors
///
/// Fails on the first invalid configuration or on duplicate names.
pub fn build_schedulers<S>(
    configs: &[SchedulerConfig],
    spawner: &S,
) -> Result<HashMap<String, Scheduler<S>>, SchedulerError>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    let mut schedulers = HashMap::with_capacity(configs.len());
    for cfg in configs {
        if schedulers.contains_key(&cfg.name) {
            return Err(SchedulerError::Config(format!(
                "duplicate scheduler name `{}`",
                cfg.name
            )));
        }
        let scheduler = SchedulerBuilder::from_config(cfg)
            .build_with_spawner(spawner.clone())
            .map_err(|e| SchedulerError::Config(format!("scheduler `{}` invalid: {e}", cfg.name)))?;
        schedulers.insert(cfg.name.clone(), scheduler);
    }
    Ok(schedulers)
}
