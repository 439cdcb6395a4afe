use std::time::{Duration, Instant};
use log::info;

/// Logs the wall time between creation and drop of one pipeline stage
pub struct ScopedTimer<'a> {
    name: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        info!("{} took {:.2}ms", self.name, self.elapsed().as_secs_f64() * 1000.0);
    }
}

/// Runs `f` and logs how long it took under `name`
pub fn timed<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let _timer = ScopedTimer::new(name);
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_timer_elapsed() {
        let timer = ScopedTimer::new("stage");
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.elapsed() >= Duration::from_millis(5));
        assert_eq!(timed("closure", || 7), 7);
    }
}
