//! Memory State
//!
//! The address space together with the list of tasks currently tracked as
//! live. Both are mutated together so that a task is tracked exactly when it
//! owns slots; [`SharedState`] puts them behind a single lock.

use entities_tasks::{Task, TaskId};
use log::info;
use parking_lot::Mutex;
use std::sync::Arc;
use usecases_memory_management::{AddressSpace, AllocationError, Placement, Strategy};

/// Memory state shared between the foreground caller and the lifecycle thread
pub type SharedState = Arc<Mutex<MemoryState>>;

/// Address space plus the tasks placed in it, in placement order
#[derive(Debug, Clone)]
pub struct MemoryState {
    space: AddressSpace,
    tracked: Vec<Task>,
}

impl MemoryState {
    pub fn new(capacity: usize) -> Self {
        Self {
            space: AddressSpace::new(capacity),
            tracked: Vec::new(),
        }
    }

    /// Wrap this state for sharing with a [`LifecycleManager`](crate::LifecycleManager)
    pub fn into_shared(self) -> SharedState {
        Arc::new(Mutex::new(self))
    }

    pub fn space(&self) -> &AddressSpace {
        &self.space
    }

    /// Tracked tasks, oldest first
    pub fn tasks(&self) -> &[Task] {
        &self.tracked
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tracked.iter().find(|task| task.id() == id)
    }

    /// Allocate `task` and start tracking it
    ///
    /// The task is only tracked when the allocation succeeds.
    pub fn place(&mut self, task: Task, strategy: Strategy) -> Result<Placement, AllocationError> {
        let placement = self.space.allocate(&task, strategy)?;
        self.tracked.push(task);
        Ok(placement)
    }

    /// Track a task that has already been allocated in [`space_mut`](Self::space_mut)
    ///
    /// Tasks that own no slots are not tracked; returns whether the task was added.
    pub fn adopt(&mut self, task: Task) -> bool {
        if self.space.is_allocated(task.id()) && self.get(task.id()).is_none() {
            self.tracked.push(task);
            true
        } else {
            false
        }
    }

    /// Mutable access to the address space, for replaying snapshots
    ///
    /// Callers must [`adopt`](Self::adopt) every task they allocate here.
    pub fn space_mut(&mut self) -> &mut AddressSpace {
        &mut self.space
    }

    /// Stop tracking and release the oldest task
    pub fn remove_oldest(&mut self) -> Option<Task> {
        if self.tracked.is_empty() {
            return None;
        }
        let task = self.tracked.remove(0);
        self.space.release(task.id());
        Some(task)
    }

    /// Stop tracking and release the task with `id`
    pub fn remove(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tracked.iter().position(|task| task.id() == id)?;
        let task = self.tracked.remove(index);
        self.space.release(task.id());
        Some(task)
    }

    pub fn defragment(&mut self) -> usize {
        self.space.defragment()
    }

    /// Advance every tracked task by one tick
    ///
    /// Tasks whose lifetime runs out are untracked and released. Returns the
    /// expired tasks in tracking order.
    pub fn tick(&mut self) -> Vec<Task> {
        let snapshot = std::mem::take(&mut self.tracked);
        let mut expired = Vec::new();

        for mut task in snapshot {
            if task.tick() {
                self.space.release(task.id());
                info!("task {} '{}' expired", task.id(), task.name());
                expired.push(task);
            } else {
                self.tracked.push(task);
            }
        }

        expired
    }
}
