//! Simulator Configuration
//!
//! Defaults, overridden by environment variables, overridden in turn by
//! command-line flags (see [`args`](crate::args)).
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MEMSIM_CAPACITY` | Number of slots in the address space | 8192 |
//! | `MEMSIM_TICK_MS` | Lifecycle tick in milliseconds | 1000 |
//! | `MEMSIM_STRATEGY` | Default placement strategy | first_fit |
//! | `MEMSIM_SNAPSHOT` | Snapshot file used by `save`/`load` | memory_state.txt |
//! | `MEMSIM_LIFECYCLE` | Run the lifecycle thread ("true"/"false") | true |
//!
//! Logging verbosity is controlled separately through `RUST_LOG`.

use api_facades::{RandomTaskConfig, SessionConfig, DEFAULT_CAPACITY, DEFAULT_TICK_INTERVAL};
use infrastructure_snapshot::DEFAULT_SNAPSHOT_FILE;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use usecases_memory_management::Strategy;

pub const ENV_CAPACITY: &str = "MEMSIM_CAPACITY";
pub const ENV_TICK_MS: &str = "MEMSIM_TICK_MS";
pub const ENV_STRATEGY: &str = "MEMSIM_STRATEGY";
pub const ENV_SNAPSHOT: &str = "MEMSIM_SNAPSHOT";
pub const ENV_LIFECYCLE: &str = "MEMSIM_LIFECYCLE";

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
    #[error("failed to parse environment variable '{var}': '{value}'")]
    EnvParse { var: &'static str, value: String },
}

/// Complete simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub capacity: usize,
    pub tick_interval: Duration,
    /// When false, lifetimes only advance on the console `tick` command
    pub lifecycle_enabled: bool,
    pub strategy: Strategy,
    pub snapshot_path: PathBuf,
    pub random: RandomTaskConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tick_interval: DEFAULT_TICK_INTERVAL,
            lifecycle_enabled: true,
            strategy: Strategy::FirstFit,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_FILE),
            random: RandomTaskConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Defaults overridden by `MEMSIM_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CAPACITY) {
            config.capacity = parse_env(ENV_CAPACITY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TICK_MS) {
            config.tick_interval = Duration::from_millis(parse_env(ENV_TICK_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_STRATEGY) {
            config.strategy = parse_env(ENV_STRATEGY, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SNAPSHOT) {
            if !raw.trim().is_empty() {
                config.snapshot_path = PathBuf::from(raw.trim());
            }
        }
        if let Some(raw) = lookup(ENV_LIFECYCLE) {
            config.lifecycle_enabled = parse_bool(&raw).ok_or(ConfigError::EnvParse {
                var: ENV_LIFECYCLE,
                value: raw.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capacity",
                message: "must be at least 1".into(),
            });
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "tick_interval",
                message: "must be at least 1 ms".into(),
            });
        }
        Ok(())
    }

    /// Parameters for [`api_facades::MemorySession::new`]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            capacity: self.capacity,
            tick_interval: self.lifecycle_enabled.then_some(self.tick_interval),
            default_strategy: self.strategy,
            random: self.random.clone(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::EnvParse {
        var,
        value: raw.to_string(),
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.capacity, 8192);
        assert_eq!(config.tick_interval, Duration::from_millis(1000));
        assert_eq!(config.strategy, Strategy::FirstFit);
        assert_eq!(config.snapshot_path, PathBuf::from("memory_state.txt"));
        assert!(config.lifecycle_enabled);
    }

    #[test]
    fn test_env_overrides() {
        let config = SimulatorConfig::from_lookup(lookup_from(&[
            (ENV_CAPACITY, "256"),
            (ENV_TICK_MS, "50"),
            (ENV_STRATEGY, "largest-fit"),
            (ENV_SNAPSHOT, "/tmp/state.txt"),
            (ENV_LIFECYCLE, "off"),
        ]))
        .unwrap();
        assert_eq!(config.capacity, 256);
        assert_eq!(config.tick_interval, Duration::from_millis(50));
        assert_eq!(config.strategy, Strategy::WorstFit);
        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/state.txt"));
        assert!(!config.lifecycle_enabled);
        assert_eq!(config.session_config().tick_interval, None);
    }

    #[test]
    fn test_env_parse_errors() {
        let err = SimulatorConfig::from_lookup(lookup_from(&[(ENV_CAPACITY, "lots")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::EnvParse { var: ENV_CAPACITY, value: "lots".into() }
        );
        assert!(SimulatorConfig::from_lookup(lookup_from(&[(ENV_STRATEGY, "next_fit")])).is_err());
        assert!(SimulatorConfig::from_lookup(lookup_from(&[(ENV_LIFECYCLE, "maybe")])).is_err());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let err = SimulatorConfig::from_lookup(lookup_from(&[(ENV_CAPACITY, "0")])).unwrap_err();
        assert!(err.to_string().contains("capacity"));
        let err = SimulatorConfig::from_lookup(lookup_from(&[(ENV_TICK_MS, "0")])).unwrap_err();
        assert!(err.to_string().contains("tick_interval"));
    }

    #[test]
    fn test_session_config_carries_tick() {
        let config = SimulatorConfig::default();
        let session = config.session_config();
        assert_eq!(session.capacity, 8192);
        assert_eq!(session.tick_interval, Some(Duration::from_secs(1)));
    }
}
