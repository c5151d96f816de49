use jobpick_core::JobPickError;
use thiserror::Error;

/// Errors raised while configuring a strategy or loading a scenario.
///
/// Evaluation itself never fails; an empty queue is reported as `None`.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("invalid weight {name}={value}: must be a finite number")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("unknown scoring policy: {0} (expected \"normalized\" or \"integer\")")]
    UnknownPolicy(String),

    #[error("scenario parse error: {0}")]
    ScenarioParse(#[from] toml::de::Error),

    #[error("scenario I/O error: {0}")]
    ScenarioIo(#[from] std::io::Error),

    #[error("lock poisoned: {0}")]
    LockPoisoned(String),

    #[error(transparent)]
    Core(#[from] JobPickError),
}
