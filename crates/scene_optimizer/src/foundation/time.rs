//! Time measurement utilities

use std::time::{Duration, Instant};

/// Simple stopwatch for measuring elapsed time
///
/// Used by the optimizer to report per-stage durations at debug level.
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Reset the stopwatch to zero
    pub fn reset(&mut self) {
        self.start_time = None;
        self.elapsed = Duration::ZERO;
    }

    /// Get the total elapsed time, including a running interval
    pub fn elapsed(&self) -> Duration {
        match self.start_time {
            Some(start) => self.elapsed + start.elapsed(),
            None => self.elapsed,
        }
    }

    /// Get the total elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopwatch_starts_stopped() {
        let stopwatch = Stopwatch::new();
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_stopwatch_accumulates() {
        let mut stopwatch = Stopwatch::start_new();
        std::thread::sleep(Duration::from_millis(1));
        stopwatch.stop();
        assert!(stopwatch.elapsed() >= Duration::from_millis(1));

        let frozen = stopwatch.elapsed();
        std::thread::sleep(Duration::from_millis(1));
        assert_eq!(stopwatch.elapsed(), frozen);
    }

    #[test]
    fn test_stopwatch_reset() {
        let mut stopwatch = Stopwatch::start_new();
        stopwatch.reset();
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);
    }
}
