use std::sync::{Arc, PoisonError, RwLock};

use chrono::Utc;
use tracing::info;

use crate::error::StrategyError;

use super::evaluate::{ScheduleStrategy, Strategy};
use super::job::JobStatus;
use super::metrics::SelectionMetrics;
use super::types::StrategyConfig;

/// Cloneable strategy handle whose weights can be swapped at runtime.
///
/// The configuration is only ever replaced as a whole value. Each evaluation
/// copies the current config and scores without holding the lock.
#[derive(Debug, Clone, Default)]
pub struct SharedStrategy {
    config: Arc<RwLock<StrategyConfig>>,
    metrics: Arc<RwLock<SelectionMetrics>>,
}

impl SharedStrategy {
    /// Create a handle, rejecting non-finite weights.
    pub fn new(config: StrategyConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            metrics: Arc::new(RwLock::new(SelectionMetrics::default())),
        })
    }

    /// Copy of the current configuration.
    pub fn config(&self) -> StrategyConfig {
        // Plain data: a poisoned lock still holds a usable value.
        *self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Swap in a new configuration, returning the previous one.
    ///
    /// An invalid config is rejected and the current one stays in place.
    pub fn replace(&self, config: StrategyConfig) -> Result<StrategyConfig, StrategyError> {
        config.validate()?;
        let mut guard = self.config.write().map_err(|e| {
            StrategyError::LockPoisoned(format!("strategy config write lock: {}", e))
        })?;
        let previous = std::mem::replace(&mut *guard, config);
        info!(
            age_factor = config.age_factor,
            priority_factor = config.priority_factor,
            policy = %config.policy,
            "strategy config replaced"
        );
        Ok(previous)
    }

    /// Evaluate with the current config and record the outcome.
    pub fn evaluate(&self, jobs: &[JobStatus]) -> Option<usize> {
        let strategy = Strategy::new(self.config());
        let selection = strategy.select(jobs, Utc::now());

        self.metrics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .record(jobs, selection);

        selection.map(|s| s.index)
    }

    /// Snapshot of the selection metrics.
    pub fn metrics(&self) -> SelectionMetrics {
        self.metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ScheduleStrategy for SharedStrategy {
    fn evaluate(&self, jobs: &[JobStatus]) -> Option<usize> {
        SharedStrategy::evaluate(self, jobs)
    }
}
