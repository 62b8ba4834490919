//! Poll loop timing
//!
//! `reload_every` ticks, each after a fixed wait, then one reload; repeated
//! until stopped. Time comes from a [`Clock`] so tests can run the loop
//! without waiting.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

/// Work driven by the [`Scheduler`]
pub trait Task {
    /// One poll over every watched page
    fn tick(&mut self);

    /// Rebuild subscriptions from the wiki
    fn reload(&mut self);
}

/// Source of waiting
pub trait Clock {
    /// Wait for `duration`; `false` if `stop` fired before or during the wait
    fn sleep(&self, duration: Duration, stop: &StopHandle) -> bool;
}

/// Cross-thread stop signal
///
/// Clones share the signal. Stopping wakes a [`SystemClock`] sleep at once.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopHandle {
    /// New, not yet stopped
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop
    pub fn stop(&self) {
        let (lock, wake) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        wake.notify_all();
    }

    /// Whether [`stop`](Self::stop) was called
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wall-clock waiting, interruptible by [`StopHandle::stop`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration, stop: &StopHandle) -> bool {
        let (lock, wake) = &*stop.inner;
        let stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let (stopped, _) = wake
            .wait_timeout_while(stopped, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        !*stopped
    }
}

/// Fixed-interval loop with a slower reload cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    interval: Duration,
    reload_every: u32,
}

impl Scheduler {
    /// Tick every `interval`, reload after every `reload_every` ticks
    #[must_use]
    pub const fn new(interval: Duration, reload_every: u32) -> Self {
        Self {
            interval,
            reload_every,
        }
    }

    /// Run until `stop` fires; returns the number of ticks executed
    pub fn run(&self, task: &mut dyn Task, clock: &dyn Clock, stop: &StopHandle) -> u64 {
        let mut ticks = 0;
        loop {
            for _ in 0..self.reload_every.max(1) {
                if !clock.sleep(self.interval, stop) {
                    log::info!("stopping after {ticks} ticks");
                    return ticks;
                }
                task.tick();
                ticks += 1;
            }
            if stop.is_stopped() {
                log::info!("stopping after {ticks} ticks");
                return ticks;
            }
            task.reload();
        }
    }
}
