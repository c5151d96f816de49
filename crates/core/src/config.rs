use std::env;

use serde::{Deserialize, Serialize};

use crate::error::JobPickError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

/// Unlike the string helpers, a present-but-unparsable weight is an error
/// rather than a silent fallback to the default.
fn profiled_env_f64(profile: &str, key: &str, default: f64) -> Result<f64, JobPickError> {
    match profiled_env_opt(profile, key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: std::num::ParseFloatError| {
            JobPickError::Config {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }
        }),
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub strategy: StrategyEnv,
}

/// Well-known env keys that identify a profile when prefixed.
const PROFILE_MARKER_KEYS: &[&str] = &[
    "STRATEGY_AGE_FACTOR",
    "STRATEGY_PRIORITY_FACTOR",
    "STRATEGY_POLICY",
];

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `JOBPICK_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, JobPickError> {
        let profile = env_or("JOBPICK_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Result<Self, JobPickError> {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Ok(Self {
            profile: p.to_string(),
            strategy: StrategyEnv::from_env_profiled(p)?,
        })
    }

    /// Discover available profiles by scanning env vars for `{PREFIX}_{MARKER_KEY}` patterns.
    /// Always includes "default" (the unprefixed config).
    pub fn available_profiles() -> Vec<String> {
        let mut profiles = std::collections::BTreeSet::new();
        profiles.insert("default".to_string());

        for (key, _) in env::vars() {
            for marker in PROFILE_MARKER_KEYS {
                if let Some(prefix) = key.strip_suffix(&format!("_{}", marker)) {
                    if !prefix.is_empty()
                        && prefix.chars().all(|c| c.is_ascii_uppercase() || c == '_')
                    {
                        profiles.insert(prefix.to_string());
                    }
                }
            }
        }

        profiles.into_iter().collect()
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  strategy:    age_factor={}, priority_factor={}, policy={}",
            self.strategy.age_factor,
            self.strategy.priority_factor,
            self.strategy.policy
        );
    }
}

// ── Strategy weights ──────────────────────────────────────────

/// Strategy weights as read from the environment.
///
/// `policy` stays a plain string here; the strategy crate owns the enum and
/// rejects unknown names when converting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyEnv {
    pub age_factor: f64,
    pub priority_factor: f64,
    pub policy: String,
}

impl StrategyEnv {
    fn from_env_profiled(p: &str) -> Result<Self, JobPickError> {
        Ok(Self {
            age_factor: profiled_env_f64(p, "STRATEGY_AGE_FACTOR", 1.0)?,
            priority_factor: profiled_env_f64(p, "STRATEGY_PRIORITY_FACTOR", 1.0)?,
            policy: profiled_env_or(p, "STRATEGY_POLICY", "normalized").to_lowercase(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own profile prefix so parallel tests never share keys.

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::for_profile("CFGTESTEMPTY").unwrap();
        assert_eq!(cfg.profile, "CFGTESTEMPTY");
        assert_eq!(cfg.strategy.policy, "normalized");
    }

    #[test]
    fn profiled_keys_take_precedence() {
        env::set_var("CFGTESTA_STRATEGY_AGE_FACTOR", "1000");
        env::set_var("CFGTESTA_STRATEGY_PRIORITY_FACTOR", " 2000.5 ");
        env::set_var("CFGTESTA_STRATEGY_POLICY", "Integer");

        let cfg = Config::for_profile("cfgtesta").unwrap();
        assert_eq!(cfg.profile_label(), "CFGTESTA");
        assert_eq!(cfg.strategy.age_factor, 1000.0);
        assert_eq!(cfg.strategy.priority_factor, 2000.5);
        assert_eq!(cfg.strategy.policy, "integer");
    }

    #[test]
    fn unparsable_weight_is_an_error() {
        env::set_var("CFGTESTB_STRATEGY_AGE_FACTOR", "lots");

        let err = Config::for_profile("CFGTESTB").unwrap_err();
        match err {
            JobPickError::Config { key, value, .. } => {
                assert_eq!(key, "STRATEGY_AGE_FACTOR");
                assert_eq!(value, "lots");
            }
            other => panic!("expected config error, got {other}"),
        }
    }

    #[test]
    fn discovers_profiles_from_marker_keys() {
        env::set_var("CFGTESTC_STRATEGY_POLICY", "normalized");

        let profiles = Config::available_profiles();
        assert!(profiles.contains(&"default".to_string()));
        assert!(profiles.contains(&"CFGTESTC".to_string()));
    }

    #[test]
    fn default_profile_label() {
        let cfg = Config {
            profile: String::new(),
            strategy: StrategyEnv {
                age_factor: 1.0,
                priority_factor: 1.0,
                policy: "normalized".into(),
            },
        };
        assert_eq!(cfg.profile_label(), "default");
    }
}
