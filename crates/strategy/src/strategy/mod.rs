//! Age/priority job-selection strategy for a job pool.
//!
//! Given a snapshot of queued [`JobStatus`] values, [`Strategy`] scores every
//! candidate from its normalized queue age and its declared priority, and
//! returns the index of the best one. The pool engine owns the queue; the
//! strategy only reads the slice it is handed and never holds on to it.

pub mod evaluate;
pub mod job;
pub mod metrics;
pub mod score;
pub mod shared;
pub mod types;


pub use evaluate::{ScheduleStrategy, Strategy};
pub use job::{Job, JobStatus, Prioritizer};
pub use metrics::SelectionMetrics;
pub use score::{age, age_now, declared_priority, score};
pub use shared::SharedStrategy;
pub use types::{ScoringPolicy, Selection, StrategyConfig, StrategyOverrides};
