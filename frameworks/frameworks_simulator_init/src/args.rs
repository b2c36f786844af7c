//! Command-Line Argument Parsing Module
//!
//! Uses clap for type-safe argument parsing. Every flag is optional and, when
//! given, overrides the value from [`SimulatorConfig::from_env`].

use crate::config::{ConfigError, SimulatorConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use usecases_memory_management::Strategy;

/// Memory simulator command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "memsim")]
#[command(about = "Dynamic memory allocation simulator")]
pub struct SimulatorArgs {
    /// Number of slots in the address space
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Lifecycle tick in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Default strategy: first_fit, best_fit (smallest_fit) or worst_fit (largest_fit)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Snapshot file used by `save` and `load`
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Load the snapshot file at startup
    #[arg(long)]
    pub load: bool,

    /// Do not run the lifecycle thread; advance time with `tick`
    #[arg(long)]
    pub no_lifecycle: bool,
}

impl SimulatorArgs {
    /// Validate argument values
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == Some(0) {
            return Err("--capacity must be at least 1".to_string());
        }

        if self.tick_ms == Some(0) {
            return Err("--tick-ms must be at least 1".to_string());
        }

        if let Some(ref strategy) = self.strategy {
            strategy.parse::<Strategy>().map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    /// Overlay the given flags onto `config`
    pub fn apply(&self, config: &mut SimulatorConfig) -> Result<(), ConfigError> {
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_interval = Duration::from_millis(tick_ms);
        }
        if let Some(ref raw) = self.strategy {
            config.strategy = raw.parse().map_err(|e: usecases_memory_management::AllocationError| {
                ConfigError::InvalidValue {
                    field: "strategy",
                    message: e.to_string(),
                }
            })?;
        }
        if let Some(ref path) = self.snapshot {
            config.snapshot_path = path.clone();
        }
        if self.no_lifecycle {
            config.lifecycle_enabled = false;
        }
        config.validate()
    }
}
