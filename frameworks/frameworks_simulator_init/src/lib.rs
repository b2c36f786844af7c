//! Frameworks Layer: Simulator Initialization
//!
//! Provides the outermost layer of the memory allocation simulator: the
//! configuration sources, the command-line interface and the console front
//! end used by the `memsim` binary.
//!
//! ## Overview
//!
//! The `frameworks_simulator_init` crate is part of the frameworks layer. It
//! builds a [`SimulatorConfig`] from defaults, `MEMSIM_*` environment
//! variables and command-line flags, creates an
//! [`api_facades::MemorySession`] from it and drives the session from a
//! line-oriented console.
//!
//! ## Modules
//!
//! - **[`config`](config/index.html)**: Defaults and environment overrides
//!
//! - **[`args`](args/index.html)**: clap command-line flags
//!
//! - **[`commands`](commands/index.html)**: Console command parsing
//!
//! - **[`console`](console/index.html)**: Command execution and rendering
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (`RUST_LOG` controls verbosity)
//! 2. Read the environment, then overlay command-line flags
//! 3. Create the session, which starts the lifecycle thread unless disabled
//! 4. Optionally load the snapshot file
//! 5. Run the console until `quit` or end of input, then stop the lifecycle
//!    thread
//!
//! ## See Also
//!
//! - [`api_facades`](../../api_facades/index.html): Session facade

pub mod args;
pub mod commands;
pub mod config;
pub mod console;

pub use args::SimulatorArgs;
pub use commands::{Command, CommandError};
pub use config::{ConfigError, SimulatorConfig};
pub use console::{render_bar, Console, Flow};
