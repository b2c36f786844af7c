//! Placement Policy Trait and Types
//!
//! Defines the placement-policy interface and the shared types used by the
//! address space: free blocks, placements, strategy tags and allocation
//! errors.
//!
//! ## Overview
//!
//! The address space computes its free blocks on every request and hands
//! them to a [`PlacementPolicy`], which picks the block the task will be
//! placed at. Each strategy lives in its own module.
//!
//! ## Allocation Strategies
//!
//! - **FirstFit**: lowest-addressed block that is large enough
//! - **BestFit**: smallest block that is large enough
//! - **WorstFit**: largest block that is large enough
//!
//! Best-fit and worst-fit break ties between equally sized blocks by taking
//! the lowest-addressed one.
//!
//! ## Examples
//!
//! ```rust
//! use usecases_memory_management::{FreeBlock, PlacementPolicy, Strategy};
//!
//! let blocks = [FreeBlock::new(0, 5), FreeBlock::new(10, 2), FreeBlock::new(20, 8)];
//! let chosen = Strategy::BestFit.policy().select(&blocks, 2);
//! assert_eq!(chosen, Some(FreeBlock::new(10, 2)));
//! ```
//!
//! ## See Also
//!
//! - [`firstfit`](super::firstfit/index.html): First-fit policy
//! - [`bestfit`](super::bestfit/index.html): Best-fit policy
//! - [`worstfit`](super::worstfit/index.html): Worst-fit policy

use entities_tasks::TaskId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::bestfit::BestFit;
use crate::firstfit::FirstFit;
use crate::worstfit::WorstFit;

/// A maximal run of contiguous free slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeBlock {
    /// Index of the first free slot
    pub start: usize,
    /// Number of free slots in the run
    pub len: usize,
}

impl FreeBlock {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// One past the last slot of the block
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether a request of `size` slots fits in this block
    pub fn fits(&self, size: usize) -> bool {
        self.len >= size
    }
}

/// Region assigned to a task by a successful allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub task: TaskId,
    pub start: usize,
    pub len: usize,
}

impl Placement {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Allocation strategy tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// First block large enough, in address order
    #[default]
    FirstFit,
    /// Smallest block large enough
    BestFit,
    /// Largest block large enough
    WorstFit,
}

static FIRST_FIT: FirstFit = FirstFit;
static BEST_FIT: BestFit = BestFit;
static WORST_FIT: WorstFit = WorstFit;

impl Strategy {
    /// All strategies, in menu order
    pub const ALL: [Strategy; 3] = [Strategy::FirstFit, Strategy::BestFit, Strategy::WorstFit];

    /// Policy implementing this strategy
    pub fn policy(self) -> &'static dyn PlacementPolicy {
        match self {
            Strategy::FirstFit => &FIRST_FIT,
            Strategy::BestFit => &BEST_FIT,
            Strategy::WorstFit => &WORST_FIT,
        }
    }

    /// Canonical tag
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::FirstFit => "first_fit",
            Strategy::BestFit => "best_fit",
            Strategy::WorstFit => "worst_fit",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = AllocationError;

    /// Accepts the canonical tags plus the "smallest"/"largest" aliases,
    /// with either `_` or `-` as separator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "first_fit" | "first" | "firstfit" => Ok(Strategy::FirstFit),
            "best_fit" | "best" | "bestfit" | "smallest_fit" | "smallest" => Ok(Strategy::BestFit),
            "worst_fit" | "worst" | "worstfit" | "largest_fit" | "largest" => Ok(Strategy::WorstFit),
            _ => Err(AllocationError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Allocation errors
///
/// Every variant is reported without mutating the address space.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// No free block is large enough for the request
    #[error("no free block can hold {requested} slots (largest free block: {largest_free})")]
    NoFit { requested: usize, largest_free: usize },
    /// Strategy tag not recognised
    #[error("unknown allocation strategy '{0}'")]
    UnknownStrategy(String),
    /// The task already owns slots in this address space
    #[error("task {0} is already allocated")]
    AlreadyAllocated(TaskId),
    /// Zero-sized request
    #[error("invalid allocation size")]
    InvalidSize,
}

/// Placement policy trait for different allocation strategies
///
/// A policy only chooses among the free blocks it is given; it never
/// touches slots. Blocks arrive in ascending address order.
pub trait PlacementPolicy: Send + Sync {
    /// Pick the block a request of `size` slots should be placed at
    ///
    /// # Returns
    /// The chosen block, or `None` when no block can hold `size` slots.
    fn select(&self, blocks: &[FreeBlock], size: usize) -> Option<FreeBlock>;

    /// Strategy tag of this policy
    fn strategy(&self) -> Strategy;
}
