//! Shared provider traits for dependency injection.
//!
//! The wizard pauses briefly after warnings so the operator can read them.
//! The pause sits behind a trait so tests run without sleeping.

use std::time::Duration;

/// Trait for blocking pauses between console messages.
///
/// # Example
///
/// ```
/// use structure_maker::providers::{Delay, NoDelay};
///
/// // Tests and scripted runs skip the pause entirely
/// NoDelay.pause();
/// ```
pub trait Delay: Send + Sync {
    /// Blocks the current thread for the configured duration.
    fn pause(&self);
}

/// Default delay using `std::thread::sleep`.
pub struct ThreadSleep {
    duration: Duration,
}

impl ThreadSleep {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }
}

impl Delay for ThreadSleep {
    fn pause(&self) {
        if !self.duration.is_zero() {
            std::thread::sleep(self.duration);
        }
    }
}

/// Delay that returns immediately.
pub struct NoDelay;

impl Delay for NoDelay {
    fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_thread_sleep_waits_at_least_duration() {
        let delay = ThreadSleep::from_millis(20);
        let started = Instant::now();
        delay.pause();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_zero_duration_returns_immediately() {
        let delay = ThreadSleep::from_millis(0);
        let started = Instant::now();
        delay.pause();
        assert!(started.elapsed() < Duration::from_millis(20));
    }
}
