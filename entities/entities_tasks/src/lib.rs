//! Entities Layer: Tasks
//!
//! Provides the task entity for the memory allocation simulator.
//!
//! A [`Task`] is the unit that occupies space in the simulated address
//! space. It carries a size in slots, a remaining lifetime in ticks and an
//! informational priority. Every task gets a [`TaskId`] at construction;
//! allocators record ownership by id rather than by name.
//!
//! ## See Also
//!
//! - [`usecases_memory_management`](../../usecases/usecases_memory_management/index.html): Address space and placement strategies
//! - [`usecases_task_lifecycle`](../../usecases/usecases_task_lifecycle/index.html): Lifetime expiry

pub mod task;

pub use task::{Task, TaskError, TaskId, DEFAULT_PRIORITY, HIGH_PRIORITY};
