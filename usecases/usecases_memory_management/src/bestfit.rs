//! Best-Fit Policy
//!
//! Implements best-fit ("smallest fit") placement.
//!
//! Best-fit finds the smallest free block that is large enough to satisfy
//! the request. This minimizes wasted space but can lead to many small
//! fragments.

use super::allocator::{FreeBlock, PlacementPolicy, Strategy};

/// Best-fit placement policy
///
/// Among equally small candidates the lowest-addressed block wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl PlacementPolicy for BestFit {
    fn select(&self, blocks: &[FreeBlock], size: usize) -> Option<FreeBlock> {
        // min_by_key keeps the first of several equal minima
        blocks
            .iter()
            .copied()
            .filter(|block| block.fits(size))
            .min_by_key(|block| block.len)
    }

    fn strategy(&self) -> Strategy {
        Strategy::BestFit
    }
}
