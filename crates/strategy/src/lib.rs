pub mod error;
pub mod scenario;
pub mod strategy;

pub use error::StrategyError;
pub use scenario::{Scenario, ScenarioJob, SimJob, dispatch_order};
pub use strategy::{
    Job, JobStatus, Prioritizer, ScheduleStrategy, ScoringPolicy, Selection, SelectionMetrics,
    SharedStrategy, Strategy, StrategyConfig, StrategyOverrides,
};
