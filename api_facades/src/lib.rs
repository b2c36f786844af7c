//! API Facades Layer
//!
//! Provides the synchronized session that presentation layers (the console
//! front end, tests, future renderers) use to drive the simulator.
//!
//! ## Overview
//!
//! - **[`session_facades`](session_facades/index.html)**: [`MemorySession`],
//!   which wires the address space, the tracked task list, the lifecycle
//!   thread and snapshot persistence together behind one lock
//!
//! - **[`random_facades`](random_facades/index.html)**: [`RandomTaskConfig`],
//!   random task generation for demos
//!
//! All facades call into the inner layers; no simulator state lives here.

pub mod random_facades;
pub mod session_facades;

pub use random_facades::RandomTaskConfig;
pub use session_facades::{
    MemorySession, SessionConfig, SessionError, DEFAULT_CAPACITY, DEFAULT_TICK_INTERVAL,
};
