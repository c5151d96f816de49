use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::job::JobStatus;
use super::score::{age, declared_priority, score};
use super::types::{Selection, StrategyConfig};

/// Callback shape the pool engine invokes once per scheduling tick.
///
/// Returns the index of the job to dequeue, or `None` when there is nothing
/// to schedule this cycle.
pub trait ScheduleStrategy: Send + Sync {
    fn evaluate(&self, jobs: &[JobStatus]) -> Option<usize>;
}

impl<F> ScheduleStrategy for F
where
    F: Fn(&[JobStatus]) -> Option<usize> + Send + Sync,
{
    fn evaluate(&self, jobs: &[JobStatus]) -> Option<usize> {
        self(jobs)
    }
}

/// Picks the queued job with the highest combined age/priority score.
///
/// Stateless apart from its weights, so one value can serve concurrent
/// evaluations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Strategy {
    config: StrategyConfig,
}

impl Strategy {
    pub fn new(config: StrategyConfig) -> Self {
        Self { config }
    }

    /// Normalized-policy strategy with the given weights.
    pub fn with_factors(age_factor: f64, priority_factor: f64) -> Self {
        Self::new(StrategyConfig::new(age_factor, priority_factor))
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Index of the next job to run, measured against the wall clock.
    pub fn evaluate(&self, jobs: &[JobStatus]) -> Option<usize> {
        self.evaluate_at(jobs, Utc::now())
    }

    /// Index of the next job to run, with ages measured against `now`.
    pub fn evaluate_at(&self, jobs: &[JobStatus], now: DateTime<Utc>) -> Option<usize> {
        self.select(jobs, now).map(|s| s.index)
    }

    /// Score every candidate and return the winner.
    ///
    /// Maxima are taken over the whole slice first (age floored at 1ns,
    /// priority at 1). The scan only replaces the current best on a strictly
    /// greater score, so equal scores resolve to the lowest index.
    pub fn select(&self, jobs: &[JobStatus], now: DateTime<Utc>) -> Option<Selection> {
        if jobs.is_empty() {
            return None;
        }

        let max_age = jobs
            .iter()
            .map(|job| age(job, now))
            .max()
            .unwrap_or_default()
            .max(Duration::from_nanos(1));
        let max_priority = jobs
            .iter()
            .map(declared_priority)
            .max()
            .unwrap_or(1)
            .max(1);

        let mut best: Option<Selection> = None;
        for (index, job) in jobs.iter().enumerate() {
            let candidate = score(job, max_age, max_priority, &self.config, now);
            if best.map_or(true, |b| candidate > b.score) {
                best = Some(Selection { index, score: candidate });
            }
        }

        if let Some(sel) = best {
            debug!(
                candidates = jobs.len(),
                index = sel.index,
                score = sel.score,
                job = %jobs[sel.index].header(),
                max_age_ms = max_age.as_millis() as u64,
                max_priority,
                "selected job"
            );
        }
        best
    }
}

impl ScheduleStrategy for Strategy {
    fn evaluate(&self, jobs: &[JobStatus]) -> Option<usize> {
        Strategy::evaluate(self, jobs)
    }
}
