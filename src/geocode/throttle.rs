//! Fixed-interval pacing for external lookups.
//!
//! Every external call is followed by a full pause of `interval`, whether the
//! call succeeded or not. Calls never overlap because the geocoder owns the
//! throttle through `&mut self`.

use std::time::Duration;

/// Minimum pause the public geocoding service accepts between requests.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Something that can block the current thread for a duration.
pub trait Pacer: Send {
    fn pause(&self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub struct Throttle {
    interval: Duration,
    pacer: Box<dyn Pacer>,
    calls: u64,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self::with_pacer(interval, Box::new(ThreadPacer))
    }

    pub fn with_pacer(interval: Duration, pacer: Box<dyn Pacer>) -> Self {
        Self {
            interval,
            pacer,
            calls: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of calls run through this throttle.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Run `call`, then pause for the configured interval.
    pub fn run<T>(&mut self, call: impl FnOnce() -> T) -> T {
        let result = call();
        self.calls += 1;
        self.pacer.pause(self.interval);
        result
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle")
            .field("interval", &self.interval)
            .field("calls", &self.calls)
            .finish()
    }
}
