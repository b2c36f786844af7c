//! Use Cases Layer: Task Lifecycle
//!
//! Provides duration-based expiry of allocated tasks.
//!
//! ## Overview
//!
//! - **[`state`](state/index.html)**: [`MemoryState`], the address space and the
//!   tracked task list that are always mutated together, and [`SharedState`],
//!   the single lock both actors use
//!
//! - **[`manager`](manager/index.html)**: [`LifecycleManager`], the background
//!   thread that decrements lifetimes once per tick and releases expired tasks
//!
//! ## Concurrency
//!
//! Foreground requests and lifecycle ticks go through the same
//! `parking_lot::Mutex`. A tick ages every task under one acquisition, so no
//! foreground request observes a partially updated set of lifetimes.

pub mod manager;
pub mod state;

pub use manager::{ExpiryObserver, LifecycleError, LifecycleManager, LIFECYCLE_THREAD_NAME};
pub use state::{MemoryState, SharedState};
