//! Session Facades
//!
//! Provides [`MemorySession`], the entry point presentation layers use to
//! drive the simulator.
//!
//! A session owns the shared memory state and, optionally, the lifecycle
//! thread that expires tasks. Every method takes the shared lock for the
//! duration of one operation and returns owned data, so callers never hold
//! a view of the address space across another actor's mutation. File I/O
//! always happens outside the lock.

use crate::random_facades::RandomTaskConfig;
use entities_tasks::{Task, TaskError, TaskId};
use infrastructure_snapshot::{codec, file, LoadReport, SnapshotError};
use log::{info, warn};
use rand::Rng;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use usecases_memory_management::{AllocationError, FreeBlock, MemoryStats, Strategy};
use usecases_task_lifecycle::{ExpiryObserver, LifecycleError, LifecycleManager, MemoryState, SharedState};

/// Default number of slots
pub const DEFAULT_CAPACITY: usize = 8192;

/// Default lifecycle tick
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Request rejected before reaching the allocator
    #[error("invalid task: {0}")]
    InvalidTask(#[from] TaskError),
    /// Allocator could not place the task
    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Session construction parameters
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub capacity: usize,
    /// Lifecycle tick; `None` leaves ticking to the caller
    pub tick_interval: Option<Duration>,
    pub default_strategy: Strategy,
    pub random: RandomTaskConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tick_interval: Some(DEFAULT_TICK_INTERVAL),
            default_strategy: Strategy::FirstFit,
            random: RandomTaskConfig::default(),
        }
    }
}

/// Synchronized simulator session
pub struct MemorySession {
    state: SharedState,
    capacity: usize,
    default_strategy: Strategy,
    random: RandomTaskConfig,
    lifecycle: Option<LifecycleManager>,
}

impl MemorySession {
    /// Create a session and start its lifecycle thread (if configured)
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        Self::with_observer(config, None)
    }

    /// Like [`new`](Self::new), reporting expired tasks to `observer`
    pub fn with_observer(config: SessionConfig, observer: Option<ExpiryObserver>) -> Result<Self, SessionError> {
        let state = MemoryState::new(config.capacity).into_shared();
        let lifecycle = match config.tick_interval {
            Some(interval) => Some(LifecycleManager::start_with_observer(
                state.clone(),
                interval,
                observer,
            )?),
            None => None,
        };

        info!(
            "memory session created: {} slots, default strategy {}",
            config.capacity, config.default_strategy
        );
        Ok(Self {
            state,
            capacity: config.capacity,
            default_strategy: config.default_strategy,
            random: config.random,
            lifecycle,
        })
    }

    /// Session without a lifecycle thread; expire tasks with [`tick`](Self::tick)
    pub fn without_lifecycle(capacity: usize) -> Self {
        Self {
            state: MemoryState::new(capacity).into_shared(),
            capacity,
            default_strategy: Strategy::FirstFit,
            random: RandomTaskConfig::default(),
            lifecycle: None,
        }
    }

    /// Handle to the shared state, for callers that need several reads under one lock
    pub fn shared_state(&self) -> SharedState {
        self.state.clone()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_strategy(&self) -> Strategy {
        self.default_strategy
    }

    /// Validate, allocate and track a new task
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidTask`] for zero size or lifetime, or a size
    ///   larger than the capacity; nothing reaches the allocator
    /// - [`SessionError::Allocation`] if no free block fits
    pub fn add_task(&self, name: &str, size: usize, lifetime: u32, strategy: Strategy) -> Result<Task, SessionError> {
        let task = Task::new(name, size, lifetime)?;
        task.validate_for_capacity(self.capacity)?;
        self.place(task, strategy)
    }

    /// [`add_task`](Self::add_task) with the strategy given as a tag
    pub fn add_task_named(&self, name: &str, size: usize, lifetime: u32, strategy: &str) -> Result<Task, SessionError> {
        let strategy: Strategy = strategy.parse()?;
        self.add_task(name, size, lifetime, strategy)
    }

    /// Generate a random task and place it with the default strategy
    pub fn add_random_task<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Task, SessionError> {
        let task = self.random.generate(rng, self.capacity)?;
        self.place(task, self.default_strategy)
    }

    fn place(&self, task: Task, strategy: Strategy) -> Result<Task, SessionError> {
        let result = self.state.lock().place(task.clone(), strategy);
        match result {
            Ok(placement) => {
                info!(
                    "task '{}' added with {} at [{}, {})",
                    task.name(),
                    strategy,
                    placement.start,
                    placement.end()
                );
                Ok(task)
            }
            Err(err) => {
                warn!("allocation failed for '{}': {}", task.name(), err);
                Err(err.into())
            }
        }
    }

    /// Remove the oldest tracked task (manual removal)
    pub fn remove_oldest(&self) -> Option<Task> {
        let removed = self.state.lock().remove_oldest();
        if let Some(task) = &removed {
            info!("task '{}' removed manually", task.name());
        }
        removed
    }

    /// Remove a specific tracked task
    pub fn remove(&self, id: TaskId) -> Option<Task> {
        let removed = self.state.lock().remove(id);
        if let Some(task) = &removed {
            info!("task '{}' removed manually", task.name());
        }
        removed
    }

    /// Compact the address space; returns how many tasks moved
    pub fn defragment(&self) -> usize {
        let moved = self.state.lock().defragment();
        info!("memory defragmented ({} tasks moved)", moved);
        moved
    }

    /// Advance every tracked task by one tick, returning the expired ones
    pub fn tick(&self) -> Vec<Task> {
        self.state.lock().tick()
    }

    pub fn free_blocks(&self) -> Vec<FreeBlock> {
        self.state.lock().space().free_blocks()
    }

    pub fn stats(&self) -> MemoryStats {
        self.state.lock().space().stats()
    }

    /// Tracked tasks, oldest first
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().tasks().to_vec()
    }

    /// Copy of the slot array, for renderers
    pub fn slots(&self) -> Vec<Option<TaskId>> {
        self.state.lock().space().slots().to_vec()
    }

    /// Save the tracked task list to `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<usize, SessionError> {
        let (text, count) = {
            let guard = self.state.lock();
            (codec::encode(guard.tasks())?, guard.tasks().len())
        };
        file::write_snapshot(&path, &text)?;
        info!("memory state saved to {} ({} tasks)", path.as_ref().display(), count);
        Ok(count)
    }

    /// Load tasks from `path` and track every one that fits
    ///
    /// On a malformed line the tasks from the lines before it remain
    /// allocated and tracked, and the parse error is returned.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<LoadReport, SessionError> {
        let text = file::read_snapshot(&path)?;

        let mut guard = self.state.lock();
        match codec::load(&text, guard.space_mut()) {
            Ok(report) => {
                for task in &report.loaded {
                    guard.adopt(task.clone());
                }
                drop(guard);
                info!(
                    "memory state loaded from {} ({} tasks, {} rejected)",
                    path.as_ref().display(),
                    report.loaded.len(),
                    report.rejected.len()
                );
                Ok(report)
            }
            Err(err) => {
                for task in err.applied() {
                    guard.adopt(task.clone());
                }
                drop(guard);
                warn!("loading {} failed: {}", path.as_ref().display(), err);
                Err(err.into())
            }
        }
    }

    pub fn is_lifecycle_running(&self) -> bool {
        self.lifecycle.as_ref().is_some_and(LifecycleManager::is_running)
    }

    /// Ticks completed by the lifecycle thread (0 without one)
    pub fn lifecycle_ticks(&self) -> u64 {
        self.lifecycle.as_ref().map_or(0, LifecycleManager::ticks)
    }

    /// Stop the lifecycle thread; the session stays usable
    pub fn shutdown(&mut self) {
        if let Some(manager) = self.lifecycle.take() {
            manager.stop();
        }
    }
}
