//! Lifecycle Manager
//!
//! Provides the background thread that ages tracked tasks.
//!
//! Once per interval the thread takes the shared lock, runs
//! [`MemoryState::tick`](crate::MemoryState::tick) for all tasks and drops
//! the lock again. The lock is never held while sleeping, so stopping the
//! manager never leaves it held.

use crate::state::SharedState;
use entities_tasks::Task;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Name given to the lifecycle thread
pub const LIFECYCLE_THREAD_NAME: &str = "memsim-lifecycle";

/// Callback invoked (outside the lock) with the tasks that expired in a tick
pub type ExpiryObserver = Box<dyn Fn(&[Task]) + Send + 'static>;

/// Errors starting the lifecycle thread
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A zero tick interval would spin
    #[error("tick interval must be greater than zero")]
    ZeroInterval,
    /// The OS refused to spawn the thread
    #[error("failed to spawn lifecycle thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Handle to the running lifecycle thread
///
/// Dropping the handle stops the thread and waits for it to finish.
pub struct LifecycleManager {
    running: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl LifecycleManager {
    /// Start ticking `state` every `interval`
    pub fn start(state: SharedState, interval: Duration) -> Result<Self, LifecycleError> {
        Self::start_with_observer(state, interval, None)
    }

    /// Start ticking `state` every `interval`, reporting expiries to `observer`
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::ZeroInterval`] for a zero interval and
    /// [`LifecycleError::Spawn`] if the thread cannot be created.
    pub fn start_with_observer(
        state: SharedState,
        interval: Duration,
        observer: Option<ExpiryObserver>,
    ) -> Result<Self, LifecycleError> {
        if interval.is_zero() {
            return Err(LifecycleError::ZeroInterval);
        }

        let running = Arc::new(AtomicBool::new(true));
        let ticks = Arc::new(AtomicU64::new(0));
        let running_clone = Arc::clone(&running);
        let ticks_clone = Arc::clone(&ticks);

        let handle = thread::Builder::new()
            .name(LIFECYCLE_THREAD_NAME.to_string())
            .spawn(move || {
                lifecycle_thread_func(state, running_clone, ticks_clone, interval, observer);
            })
            .map_err(LifecycleError::Spawn)?;

        info!("lifecycle manager started, ticking every {:?}", interval);
        Ok(Self {
            running,
            ticks,
            interval,
            handle: Some(handle),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread to stop and wait for it
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::error!("lifecycle thread panicked");
            } else {
                info!("lifecycle manager stopped after {} ticks", self.ticks());
            }
        }
    }
}

impl Drop for LifecycleManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Lifecycle thread function
///
/// Sleeps until the next tick is due (waking early only to check the stop
/// flag), then ages every task under one lock acquisition.
fn lifecycle_thread_func(
    state: SharedState,
    running: Arc<AtomicBool>,
    ticks: Arc<AtomicU64>,
    interval: Duration,
    observer: Option<ExpiryObserver>,
) {
    let mut next_tick = Instant::now() + interval;

    while running.load(Ordering::Acquire) {
        let now = Instant::now();
        if now < next_tick {
            // park_timeout may wake spuriously; the loop re-checks the deadline
            thread::park_timeout(next_tick - now);
            continue;
        }
        next_tick = now + interval;

        let expired = state.lock().tick();
        let count = ticks.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("tick {} done, {} tasks expired", count, expired.len());

        if !expired.is_empty() {
            if let Some(observer) = &observer {
                observer(&expired);
            }
        }
    }
}
