//! Worst-Fit Policy
//!
//! Implements worst-fit ("largest fit") placement.
//!
//! Worst-fit places the request in the largest free block, leaving the
//! biggest possible remainder behind.

use super::allocator::{FreeBlock, PlacementPolicy, Strategy};

/// Worst-fit placement policy
///
/// Among equally large candidates the lowest-addressed block wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl PlacementPolicy for WorstFit {
    fn select(&self, blocks: &[FreeBlock], size: usize) -> Option<FreeBlock> {
        // Iterator::max_by_key returns the *last* maximum, so fold with a
        // strict comparison to keep the first one.
        blocks
            .iter()
            .copied()
            .filter(|block| block.fits(size))
            .fold(None, |best: Option<FreeBlock>, block| match best {
                Some(current) if current.len >= block.len => Some(current),
                _ => Some(block),
            })
    }

    fn strategy(&self) -> Strategy {
        Strategy::WorstFit
    }
}
