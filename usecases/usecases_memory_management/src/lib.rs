//! Use Cases Layer: Memory Management
//!
//! Provides the simulated address space and the placement strategies used to
//! allocate tasks into it.
//!
//! ## Overview
//!
//! The `usecases_memory_management` crate is part of the use cases layer of the
//! simulator. It owns the slot array, computes free blocks on demand, places
//! tasks as contiguous runs, releases them and compacts the address space.
//!
//! ## Allocation Strategies
//!
//! - **[`firstfit`](firstfit/index.html)**: First-fit - uses the first block
//!   that can satisfy the request, prioritizing allocation speed
//!
//! - **[`bestfit`](bestfit/index.html)**: Best-fit - finds the smallest block
//!   that can satisfy the request, minimizing wasted memory
//!
//! - **[`worstfit`](worstfit/index.html)**: Worst-fit - uses the largest block,
//!   keeping the remainder as large as possible
//!
//! - **[`allocator`](allocator/index.html)**: Common policy interface and types
//!
//! - **[`address_space`](address_space/index.html)**: The slot array itself
//!
//! ## See Also
//!
//! - [`entities_tasks`](../../entities/entities_tasks/index.html): Task entity
//! - [`usecases_task_lifecycle`](../usecases_task_lifecycle/index.html): Expiry driver

pub mod address_space;
pub mod allocator;
pub mod bestfit;
pub mod firstfit;
pub mod worstfit;

pub use address_space::{AddressSpace, MemoryStats};
pub use allocator::{AllocationError, FreeBlock, Placement, PlacementPolicy, Strategy};
