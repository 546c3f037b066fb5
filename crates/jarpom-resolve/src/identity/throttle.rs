use std::thread;
use std::time::{Duration, Instant};

/// Gate called before every remote query
pub trait RateLimiter {
    /// Block until the next query may be sent
    fn acquire(&mut self);
}

/// At most one query per `interval`
#[derive(Debug, Clone)]
pub struct FixedInterval {
    interval: Duration,
    last: Option<Instant>,
}

impl FixedInterval {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// One query per second
    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl RateLimiter for FixedInterval {
    fn acquire(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// No pacing at all
#[derive(Debug, Clone, Copy, Default)]
pub struct Unthrottled;

impl RateLimiter for Unthrottled {
    fn acquire(&mut self) {}
}
