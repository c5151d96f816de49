use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Priority capability a job may expose.
///
/// Returns the job's declared importance. Values below 1 are treated as 1 by
/// the strategy, so a declared priority can only raise a job above the
/// unprioritized baseline.
pub trait Prioritizer {
    fn priority(&self) -> i64;
}

/// A unit of work submitted to the pool.
///
/// Scoring only looks at whether the job exposes a [`Prioritizer`]. The
/// header and id are for logs, metrics and reports.
pub trait Job: Send + Sync {
    /// Human-readable name for logging and metrics.
    fn header(&self) -> &str;

    /// Stable identity, when the job carries one. Headers need not be unique.
    fn id(&self) -> Option<Uuid> {
        None
    }

    /// Capability check for [`Prioritizer`]. Jobs without a declared
    /// priority keep the default and are scored from baseline 1.
    fn as_prioritizer(&self) -> Option<&dyn Prioritizer> {
        None
    }
}

/// Snapshot of a queued job as handed to the strategy by the pool.
#[derive(Clone)]
pub struct JobStatus {
    job: Arc<dyn Job>,
    /// When the job entered the queue. `None` counts as age zero.
    pub queued_at: Option<DateTime<Utc>>,
}

impl JobStatus {
    /// Wrap a job that has not been queued yet.
    pub fn new(job: Arc<dyn Job>) -> Self {
        Self { job, queued_at: None }
    }

    /// Wrap a job queued at the given instant.
    pub fn queued(job: Arc<dyn Job>, at: DateTime<Utc>) -> Self {
        Self {
            job,
            queued_at: Some(at),
        }
    }

    /// Stamp the snapshot as queued now.
    pub fn mark_queued(&mut self) {
        self.queued_at = Some(Utc::now());
    }

    pub fn job(&self) -> &dyn Job {
        self.job.as_ref()
    }

    pub fn header(&self) -> &str {
        self.job.header()
    }
}

impl fmt::Debug for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobStatus")
            .field("job", &self.job.header())
            .field("queued_at", &self.queued_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl Job for Plain {
        fn header(&self) -> &str {
            "plain"
        }
    }

    struct Urgent;

    impl Job for Urgent {
        fn header(&self) -> &str {
            "urgent"
        }

        fn as_prioritizer(&self) -> Option<&dyn Prioritizer> {
            Some(self)
        }
    }

    impl Prioritizer for Urgent {
        fn priority(&self) -> i64 {
            5
        }
    }

    #[test]
    fn plain_job_has_no_priority_capability() {
        let status = JobStatus::new(Arc::new(Plain));
        assert!(status.job().as_prioritizer().is_none());
        assert!(status.queued_at.is_none());
    }

    #[test]
    fn jobs_have_no_id_by_default() {
        assert_eq!(JobStatus::new(Arc::new(Plain)).job().id(), None);
        assert_eq!(JobStatus::new(Arc::new(Urgent)).job().id(), None);
    }

    #[test]
    fn prioritizer_is_detected() {
        let status = JobStatus::new(Arc::new(Urgent));
        let p = status.job().as_prioritizer().map(|p| p.priority());
        assert_eq!(p, Some(5));
    }

    #[test]
    fn mark_queued_stamps_time() {
        let before = Utc::now();
        let mut status = JobStatus::new(Arc::new(Plain));
        status.mark_queued();
        let at = status.queued_at.unwrap();
        assert!(at >= before);
        assert!(at <= Utc::now());
    }

    #[test]
    fn debug_shows_header() {
        let status = JobStatus::new(Arc::new(Urgent));
        let dbg = format!("{:?}", status);
        assert!(dbg.contains("urgent"), "got {dbg}");
    }
}
