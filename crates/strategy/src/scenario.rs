//! Queue scenarios for exercising a strategy outside a live pool.
//!
//! A scenario is a TOML file with an optional `[strategy]` section and a list
//! of `[[jobs]]`, each queued at an offset from a common start instant. The
//! section may set any subset of `age_factor`, `priority_factor` and `policy`:
//!
//! ```toml
//! [strategy]
//! age_factor = 1000
//! priority_factor = 2000
//!
//! [[jobs]]
//! name = "reindex"
//! queued_offset_ms = -1000
//! priority = 2
//! ```

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::StrategyError;
use crate::strategy::{Job, JobStatus, Prioritizer, ScheduleStrategy, StrategyOverrides};

/// A queue snapshot description plus optional strategy weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Weights set by the scenario. Fields left out fall back to whatever the
    /// caller layers underneath, usually the environment.
    #[serde(default)]
    pub strategy: StrategyOverrides,

    #[serde(default)]
    pub jobs: Vec<ScenarioJob>,
}

/// One queued job in a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioJob {
    pub name: String,
    /// Offset from the scenario start in milliseconds (negative = already
    /// waiting). Omit for a job that was never queued.
    pub queued_offset_ms: Option<i64>,
    /// Declared priority. Omit for a job without the priority capability.
    pub priority: Option<i64>,
}

impl Scenario {
    /// Parse a scenario from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, StrategyError> {
        let scenario: Self = toml::from_str(toml_str)?;
        scenario.strategy.validate()?;
        Ok(scenario)
    }

    /// Load a scenario from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StrategyError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Build job snapshots with every offset applied to `start`.
    pub fn snapshots(&self, start: DateTime<Utc>) -> Vec<JobStatus> {
        self.jobs
            .iter()
            .map(|entry| {
                let job: Arc<dyn Job> = Arc::new(SimJob::new(&entry.name, entry.priority));
                match entry.queued_offset_ms {
                    Some(ms) => JobStatus::queued(job, start + TimeDelta::milliseconds(ms)),
                    None => JobStatus::new(job),
                }
            })
            .collect()
    }
}

/// Job stand-in built from a [`ScenarioJob`].
#[derive(Debug, Clone)]
pub struct SimJob {
    pub id: Uuid,
    pub name: String,
    pub priority: Option<i64>,
}

impl SimJob {
    pub fn new(name: &str, priority: Option<i64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            priority,
        }
    }
}

impl Job for SimJob {
    fn header(&self) -> &str {
        &self.name
    }

    fn id(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn as_prioritizer(&self) -> Option<&dyn Prioritizer> {
        self.priority.map(|_| self as &dyn Prioritizer)
    }
}

impl Prioritizer for SimJob {
    fn priority(&self) -> i64 {
        self.priority.unwrap_or(1)
    }
}

/// Drain `queue` the way a pool engine would: evaluate, dequeue the selected
/// job, repeat. Returns the jobs in dispatch order.
pub fn dispatch_order<S>(strategy: &S, mut queue: Vec<JobStatus>) -> Vec<JobStatus>
where
    S: ScheduleStrategy + ?Sized,
{
    let mut order = Vec::with_capacity(queue.len());
    while let Some(index) = strategy.evaluate(&queue) {
        if index >= queue.len() {
            // A callback returning an out-of-range index ends the run.
            debug!(index, remaining = queue.len(), "strategy returned invalid index");
            break;
        }
        let job = queue.remove(index);
        info!(
            job = %job.header(),
            id = ?job.job().id(),
            remaining = queue.len(),
            "dispatched"
        );
        order.push(job);
    }
    order
}
