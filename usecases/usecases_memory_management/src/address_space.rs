//! Address Space
//!
//! Owns the simulated memory: a fixed-length sequence of slots, each either
//! free or owned by one task. All placement, release and compaction goes
//! through [`AddressSpace`].
//!
//! Free blocks are never cached. [`AddressSpace::free_blocks`] rescans the
//! slots on every call, O(capacity), so its result is only meaningful until
//! the next mutation.

use crate::allocator::{AllocationError, FreeBlock, Placement, Strategy};
use entities_tasks::{Task, TaskId};
use log::debug;
use std::collections::HashMap;
use std::ops::Range;

/// Snapshot of address-space occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStats {
    pub capacity: usize,
    pub free: usize,
    pub used: usize,
    /// Number of free blocks
    pub free_blocks: usize,
    pub largest_free_block: usize,
    /// Number of distinct tasks owning slots
    pub allocated_tasks: usize,
}

impl MemoryStats {
    /// Share of free space that lies outside the largest free block, in `[0, 1]`
    pub fn fragmentation(&self) -> f64 {
        if self.free == 0 {
            0.0
        } else {
            1.0 - self.largest_free_block as f64 / self.free as f64
        }
    }
}

/// Fixed-capacity slot array with strategy-driven placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSpace {
    slots: Vec<Option<TaskId>>,
}

impl AddressSpace {
    /// Create an address space of `capacity` free slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Read-only view of every slot, for renderers
    pub fn slots(&self) -> &[Option<TaskId>] {
        &self.slots
    }

    /// Owner of slot `index`, `None` if free or out of range
    pub fn owner_at(&self, index: usize) -> Option<TaskId> {
        self.slots.get(index).copied().flatten()
    }

    /// Maximal runs of free slots, in ascending address order
    pub fn free_blocks(&self) -> Vec<FreeBlock> {
        let mut blocks = Vec::new();
        let mut run_start: Option<usize> = None;

        for (index, slot) in self.slots.iter().enumerate() {
            match (slot, run_start) {
                (None, None) => run_start = Some(index),
                (Some(_), Some(start)) => {
                    blocks.push(FreeBlock::new(start, index - start));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            blocks.push(FreeBlock::new(start, self.slots.len() - start));
        }

        blocks
    }

    /// Place `task` as one contiguous run chosen by `strategy`
    ///
    /// # Errors
    ///
    /// - [`AllocationError::InvalidSize`] for a zero-sized task
    /// - [`AllocationError::AlreadyAllocated`] if the task already owns slots here
    /// - [`AllocationError::NoFit`] if no free block is large enough
    ///
    /// The address space is left untouched on every error.
    pub fn allocate(&mut self, task: &Task, strategy: Strategy) -> Result<Placement, AllocationError> {
        let size = task.size();
        if size == 0 {
            return Err(AllocationError::InvalidSize);
        }
        if self.is_allocated(task.id()) {
            return Err(AllocationError::AlreadyAllocated(task.id()));
        }

        let blocks = self.free_blocks();
        let block = strategy.policy().select(&blocks, size).ok_or_else(|| {
            AllocationError::NoFit {
                requested: size,
                largest_free: blocks.iter().map(|b| b.len).max().unwrap_or(0),
            }
        })?;

        self.slots[block.start..block.start + size].fill(Some(task.id()));
        debug!(
            "allocated {} slots [{}, {}) to {} using {}",
            size,
            block.start,
            block.start + size,
            task.id(),
            strategy
        );

        Ok(Placement {
            task: task.id(),
            start: block.start,
            len: size,
        })
    }

    /// Same as [`allocate`](Self::allocate) with the strategy given as a tag
    ///
    /// An unrecognised tag fails with [`AllocationError::UnknownStrategy`]
    /// and does not mutate anything.
    pub fn allocate_named(&mut self, task: &Task, strategy: &str) -> Result<Placement, AllocationError> {
        let strategy: Strategy = strategy.parse()?;
        self.allocate(task, strategy)
    }

    /// Free every slot owned by `id`
    ///
    /// Returns the number of slots freed. Releasing a task that owns nothing
    /// is a no-op returning 0.
    pub fn release(&mut self, id: TaskId) -> usize {
        let mut freed = 0;
        for slot in self.slots.iter_mut().filter(|slot| **slot == Some(id)) {
            *slot = None;
            freed += 1;
        }
        if freed > 0 {
            debug!("released {} slots owned by {}", freed, id);
        }
        freed
    }

    /// Compact all owners toward address 0
    ///
    /// Owners are laid out in the order their slots first appear in the
    /// current layout, each as one contiguous run of the slots it owned.
    /// All free space ends up in a single block at the high end.
    ///
    /// Returns the number of owners whose first slot moved.
    pub fn defragment(&mut self) -> usize {
        let layout = self.owners_in_order();
        let mut compacted = vec![None; self.slots.len()];
        let mut next = 0;
        let mut moved = 0;

        for (id, first, count) in layout {
            if first != next {
                moved += 1;
            }
            compacted[next..next + count].fill(Some(id));
            next += count;
        }

        self.slots = compacted;
        debug!("defragmented address space, {} owners moved", moved);
        moved
    }

    /// Owners as `(id, first slot, slot count)`, in order of first appearance
    fn owners_in_order(&self) -> Vec<(TaskId, usize, usize)> {
        let mut order: Vec<(TaskId, usize, usize)> = Vec::new();
        let mut index_of: HashMap<TaskId, usize> = HashMap::new();

        for (slot, owner) in self.slots.iter().enumerate() {
            let Some(id) = owner else { continue };
            match index_of.get(id) {
                Some(&i) => order[i].2 += 1,
                None => {
                    index_of.insert(*id, order.len());
                    order.push((*id, slot, 1));
                }
            }
        }

        order
    }

    /// Distinct owners in address order
    pub fn allocated_ids(&self) -> Vec<TaskId> {
        self.owners_in_order().into_iter().map(|(id, _, _)| id).collect()
    }

    /// Number of slots owned by `id`
    pub fn owned_by(&self, id: TaskId) -> usize {
        self.slots.iter().filter(|slot| **slot == Some(id)).count()
    }

    pub fn is_allocated(&self, id: TaskId) -> bool {
        self.slots.contains(&Some(id))
    }

    /// Region owned by `id`, if it owns one contiguous run
    pub fn region_of(&self, id: TaskId) -> Option<Range<usize>> {
        let start = self.slots.iter().position(|slot| *slot == Some(id))?;
        let end = self.slots.iter().rposition(|slot| *slot == Some(id))? + 1;
        if self.slots[start..end].iter().all(|slot| *slot == Some(id)) {
            Some(start..end)
        } else {
            None
        }
    }

    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn used_count(&self) -> usize {
        self.capacity() - self.free_count()
    }

    pub fn largest_free_block(&self) -> usize {
        self.free_blocks().iter().map(|b| b.len).max().unwrap_or(0)
    }

    pub fn stats(&self) -> MemoryStats {
        let blocks = self.free_blocks();
        let free: usize = blocks.iter().map(|b| b.len).sum();
        MemoryStats {
            capacity: self.capacity(),
            free,
            used: self.capacity() - free,
            free_blocks: blocks.len(),
            largest_free_block: blocks.iter().map(|b| b.len).max().unwrap_or(0),
            allocated_tasks: self.owners_in_order().len(),
        }
    }
}
