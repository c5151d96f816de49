//! Per-job scoring: queue age, declared priority, and the weighted composite.

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::job::JobStatus;
use super::types::{ScoringPolicy, StrategyConfig};

/// Time the job has spent queued as of `now`.
///
/// Unqueued jobs, and jobs stamped after `now`, have age zero.
pub fn age(job: &JobStatus, now: DateTime<Utc>) -> Duration {
    match job.queued_at {
        Some(at) => now.signed_duration_since(at).to_std().unwrap_or_default(),
        None => Duration::ZERO,
    }
}

/// [`age`] measured against the wall clock.
pub fn age_now(job: &JobStatus) -> Duration {
    age(job, Utc::now())
}

/// Declared importance, floored at 1. Jobs without the priority capability
/// sit at the baseline of 1.
pub fn declared_priority(job: &JobStatus) -> i64 {
    job.job()
        .as_prioritizer()
        .map_or(1, |p| p.priority().max(1))
}

/// Composite score of `job` relative to the candidate-set maxima.
///
/// `max_age` and `max_priority` must already be floored (1ns and 1) by the
/// caller; see [`Strategy::select`](super::Strategy::select).
pub fn score(
    job: &JobStatus,
    max_age: Duration,
    max_priority: i64,
    config: &StrategyConfig,
    now: DateTime<Utc>,
) -> f64 {
    match config.policy {
        ScoringPolicy::Normalized => normalized_score(job, max_age, max_priority, config, now),
        ScoringPolicy::Integer => integer_score(job, max_age, config, now) as f64,
    }
}

fn normalized_score(
    job: &JobStatus,
    max_age: Duration,
    max_priority: i64,
    config: &StrategyConfig,
    now: DateTime<Utc>,
) -> f64 {
    let age_ratio = age(job, now).as_nanos() as f64 / max_age.as_nanos() as f64;
    let priority_ratio = declared_priority(job) as f64 / max_priority as f64;

    age_ratio * config.effective_age_factor()
        + priority_ratio * config.effective_priority_factor()
}

fn integer_score(
    job: &JobStatus,
    max_age: Duration,
    config: &StrategyConfig,
    now: DateTime<Utc>,
) -> i128 {
    // `as` saturates huge finite weights; the arithmetic below saturates too,
    // so any weight that passes validation yields a score instead of a panic.
    let age_factor = config.effective_age_factor() as i128;
    let priority_factor = config.effective_priority_factor() as i128;

    // Only jobs that declare a priority get a priority term here.
    let priority_term = job
        .job()
        .as_prioritizer()
        .map_or(0, |p| i128::from(p.priority().max(1)).saturating_mul(priority_factor));

    let age_nanos = age(job, now).as_nanos() as i128;
    let max_nanos = max_age.as_nanos().max(1) as i128;

    priority_term.saturating_add((age_nanos / max_nanos).saturating_mul(age_factor))
}
