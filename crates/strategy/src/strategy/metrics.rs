use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::job::JobStatus;
use super::types::Selection;

/// Selection counters, readable by whoever drives the pool.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SelectionMetrics {
    /// Total evaluations, including empty ones.
    pub evaluations: u64,
    /// Evaluations that had nothing to pick from.
    pub empty_evaluations: u64,
    /// Times each job header was selected.
    pub picks: HashMap<String, u64>,
    /// When the last job was selected.
    pub last_pick_at: Option<DateTime<Utc>>,
    /// Winning score of the last selection.
    pub last_score: Option<f64>,
}

impl SelectionMetrics {
    /// Record the outcome of one evaluation over `jobs`.
    pub fn record(&mut self, jobs: &[JobStatus], selection: Option<Selection>) {
        self.evaluations += 1;

        let Some(sel) = selection else {
            self.empty_evaluations += 1;
            return;
        };

        if let Some(job) = jobs.get(sel.index) {
            *self.picks.entry(job.header().to_string()).or_default() += 1;
        }
        self.last_pick_at = Some(Utc::now());
        self.last_score = Some(sel.score);
    }
}
