use std::fmt;
use std::str::FromStr;

use jobpick_core::StrategyEnv;
use serde::{Deserialize, Serialize};

use crate::error::StrategyError;

/// How the age and priority terms are combined into a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    /// Both terms rescaled to `[0, 1]` against the largest value in the
    /// candidate set, then weighted.
    #[default]
    Normalized,
    /// Fixed-point scheme: `max(priority, 1) * priority_factor` for jobs that
    /// declare a priority, plus `(age / max_age) * age_factor` with integer
    /// division, so only the oldest jobs receive an age bonus.
    Integer,
}

impl FromStr for ScoringPolicy {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normalized" => Ok(Self::Normalized),
            "integer" => Ok(Self::Integer),
            other => Err(StrategyError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normalized => f.write_str("normalized"),
            Self::Integer => f.write_str("integer"),
        }
    }
}

/// Strategy weights, typically parsed from TOML or the environment.
///
/// Factors below 1 (zero and negatives included) are floored to 1 when
/// scoring, so a term can be de-emphasised relative to the other but never
/// switched off or inverted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Weight of elapsed queue time.
    #[serde(default = "default_age_factor")]
    pub age_factor: f64,
    /// Weight of declared priority.
    #[serde(default = "default_priority_factor")]
    pub priority_factor: f64,
    #[serde(default)]
    pub policy: ScoringPolicy,
}

fn default_age_factor() -> f64 { 1.0 }
fn default_priority_factor() -> f64 { 1.0 }

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            age_factor: default_age_factor(),
            priority_factor: default_priority_factor(),
            policy: ScoringPolicy::default(),
        }
    }
}

impl StrategyConfig {
    pub fn new(age_factor: f64, priority_factor: f64) -> Self {
        Self {
            age_factor,
            priority_factor,
            policy: ScoringPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build from weights read out of the environment.
    pub fn from_env_config(env: &StrategyEnv) -> Result<Self, StrategyError> {
        let config = Self {
            age_factor: env.age_factor,
            priority_factor: env.priority_factor,
            policy: env.policy.parse()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject weights that would poison every score (NaN, infinities).
    pub fn validate(&self) -> Result<(), StrategyError> {
        if !self.age_factor.is_finite() {
            return Err(StrategyError::InvalidWeight {
                name: "age_factor",
                value: self.age_factor,
            });
        }
        if !self.priority_factor.is_finite() {
            return Err(StrategyError::InvalidWeight {
                name: "priority_factor",
                value: self.priority_factor,
            });
        }
        Ok(())
    }

    /// Age weight as applied when scoring (floored at 1).
    pub fn effective_age_factor(&self) -> f64 {
        self.age_factor.max(1.0)
    }

    /// Priority weight as applied when scoring (floored at 1).
    pub fn effective_priority_factor(&self) -> f64 {
        self.priority_factor.max(1.0)
    }
}

/// Partially specified weights, such as a scenario's `[strategy]` section or
/// a set of command-line flags.
///
/// Layers are merged field by field with [`or`](Self::or); whatever is still
/// unset after merging comes from the base config passed to
/// [`apply`](Self::apply).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<ScoringPolicy>,
}

impl StrategyOverrides {
    /// Fill the fields unset here from `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            age_factor: self.age_factor.or(fallback.age_factor),
            priority_factor: self.priority_factor.or(fallback.priority_factor),
            policy: self.policy.or(fallback.policy),
        }
    }

    /// True when every field is set, so [`apply`](Self::apply) ignores its base.
    pub fn is_complete(&self) -> bool {
        self.age_factor.is_some() && self.priority_factor.is_some() && self.policy.is_some()
    }

    /// Overlay the set fields onto `base`.
    pub fn apply(self, base: StrategyConfig) -> StrategyConfig {
        StrategyConfig {
            age_factor: self.age_factor.unwrap_or(base.age_factor),
            priority_factor: self.priority_factor.unwrap_or(base.priority_factor),
            policy: self.policy.unwrap_or(base.policy),
        }
    }

    /// Reject non-finite weights among the fields that are set.
    pub fn validate(&self) -> Result<(), StrategyError> {
        self.apply(StrategyConfig::default()).validate()
    }
}

/// Outcome of one evaluation: the chosen index and the score it won with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Selection {
    pub index: usize,
    pub score: f64,
}
