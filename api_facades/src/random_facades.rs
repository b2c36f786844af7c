//! Random Task Facades
//!
//! Generates random task requests for demos and stress runs.

use entities_tasks::{Task, TaskError};
use rand::Rng;
use std::ops::RangeInclusive;

/// Ranges used when generating random tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomTaskConfig {
    /// Size in slots; clamped to the address-space capacity
    pub size: RangeInclusive<usize>,
    /// Lifetime in ticks
    pub lifetime: RangeInclusive<u32>,
    /// Numeric suffix appended to the `Task_` name prefix
    pub name_suffix: RangeInclusive<u32>,
}

impl Default for RandomTaskConfig {
    fn default() -> Self {
        Self {
            size: 1..=10,
            lifetime: 5..=20,
            name_suffix: 1..=100,
        }
    }
}

impl RandomTaskConfig {
    /// Draw a task that fits in an address space of `capacity` slots
    ///
    /// Returns [`TaskError::ExceedsCapacity`] only when `capacity` is 0.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, capacity: usize) -> Result<Task, TaskError> {
        let high = (*self.size.end()).min(capacity).max(1);
        let low = (*self.size.start()).clamp(1, high);
        let size = rng.gen_range(low..=high);

        let lifetime_low = (*self.lifetime.start()).max(1);
        let lifetime_high = (*self.lifetime.end()).max(lifetime_low);
        let lifetime = rng.gen_range(lifetime_low..=lifetime_high);

        let suffix_high = (*self.name_suffix.end()).max(*self.name_suffix.start());
        let suffix = rng.gen_range(*self.name_suffix.start()..=suffix_high);

        let task = Task::new(format!("Task_{}", suffix), size, lifetime)?;
        task.validate_for_capacity(capacity)?;
        Ok(task)
    }
}
