//! Task Entity
//!
//! Provides the Task struct and its identifier type.
//!
//! A task is a named request for a number of contiguous slots in the
//! simulated address space, kept alive for a number of ticks. Slot ownership
//! is recorded by [`TaskId`], so two tasks that share a name are still
//! distinct owners.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Priority given to tasks that do not specify one (and to loaded tasks).
pub const DEFAULT_PRIORITY: u8 = 0;

/// Priority value used for high-priority tasks.
pub const HIGH_PRIORITY: u8 = 1;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Stable handle identifying one task instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Allocate a fresh, process-unique id
    pub fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Rebuild a handle from its raw value (as printed by `Display`)
///
/// The result only names a task if that value came from [`TaskId::next`].
impl From<u64> for TaskId {
    fn from(raw: u64) -> Self {
        TaskId(raw)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reasons a task request is rejected before it reaches an allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Size must be at least one slot
    #[error("task size must be positive")]
    ZeroSize,
    /// Lifetime must be at least one tick
    #[error("task lifetime must be positive")]
    ZeroLifetime,
    /// Size larger than the whole address space
    #[error("task size {size} exceeds memory capacity {capacity}")]
    ExceedsCapacity { size: usize, capacity: usize },
}

/// A resource request occupying `size` slots for `remaining_lifetime` ticks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    name: String,
    size: usize,
    remaining_lifetime: u32,
    priority: u8,
}

impl Task {
    /// Create a new task with the default priority
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::ZeroSize`] if `size` is 0 and
    /// [`TaskError::ZeroLifetime`] if `lifetime` is 0.
    pub fn new(name: impl Into<String>, size: usize, lifetime: u32) -> Result<Self, TaskError> {
        if size == 0 {
            return Err(TaskError::ZeroSize);
        }
        if lifetime == 0 {
            return Err(TaskError::ZeroLifetime);
        }
        Ok(Self {
            id: TaskId::next(),
            name: name.into(),
            size,
            remaining_lifetime: lifetime,
            priority: DEFAULT_PRIORITY,
        })
    }

    /// Set the (informational) priority
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    /// Reject tasks that could never fit in an address space of `capacity` slots
    pub fn validate_for_capacity(&self, capacity: usize) -> Result<(), TaskError> {
        if self.size > capacity {
            return Err(TaskError::ExceedsCapacity {
                size: self.size,
                capacity,
            });
        }
        Ok(())
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn remaining_lifetime(&self) -> u32 {
        self.remaining_lifetime
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    /// Consume one tick of lifetime
    ///
    /// Returns `true` once the lifetime has run out.
    pub fn tick(&mut self) -> bool {
        self.remaining_lifetime = self.remaining_lifetime.saturating_sub(1);
        self.is_expired()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_lifetime == 0
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} (size {}, {} ticks left)",
            self.id, self.name, self.size, self.remaining_lifetime
        )
    }
}
