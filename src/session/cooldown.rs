//! Minimum spacing between gateway probes.

use std::{
    thread,
    time::{Duration, Instant},
};

/// Enforces a minimum interval between the starts of consecutive probes.
///
/// The first call to [`Cooldown::wait`] returns immediately.
#[derive(Debug, Clone)]
pub struct Cooldown {
    interval: Duration,
    last: Option<Instant>,
}

impl Cooldown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the interval since the previous call has elapsed, then
    /// start a new interval. Returns how long it slept.
    pub fn wait(&mut self) -> Duration {
        let slept = match self.last {
            Some(last) => {
                let remaining = self.interval.saturating_sub(last.elapsed());
                if !remaining.is_zero() {
                    thread::sleep(remaining);
                }
                remaining
            }
            None => Duration::ZERO,
        };
        self.last = Some(Instant::now());
        slept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_wait_is_free() {
        let mut cooldown = Cooldown::new(Duration::from_secs(60));
        assert_eq!(cooldown.wait(), Duration::ZERO);
    }

    #[test]
    fn test_zero_interval_never_sleeps() {
        let mut cooldown = Cooldown::new(Duration::ZERO);
        for _ in 0..3 {
            assert_eq!(cooldown.wait(), Duration::ZERO);
        }
    }

    #[test]
    fn test_enforces_spacing() {
        let interval = Duration::from_millis(20);
        let mut cooldown = Cooldown::new(interval);
        cooldown.wait();
        let started = Instant::now();
        cooldown.wait();
        assert!(started.elapsed() >= interval / 2);
    }
}
