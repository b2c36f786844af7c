//! First-Fit Policy
//!
//! Implements first-fit placement.
//!
//! First-fit takes the first free block, in address order, that is large
//! enough to satisfy the request. It is the cheapest policy to evaluate but
//! tends to leave small fragments near the start of the address space.

use super::allocator::{FreeBlock, PlacementPolicy, Strategy};

/// First-fit placement policy
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl PlacementPolicy for FirstFit {
    fn select(&self, blocks: &[FreeBlock], size: usize) -> Option<FreeBlock> {
        blocks.iter().copied().find(|block| block.fits(size))
    }

    fn strategy(&self) -> Strategy {
        Strategy::FirstFit
    }
}
