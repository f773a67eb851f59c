//! Some modes animate hue and radius over time. The time source is injected so that runs can be
//! made deterministic.

/// A source of time, in milliseconds. Read once per tick.
pub trait Clock {
    /// The current time in milliseconds.
    fn now_millis(&self) -> f64;
}

/// Wall-clock time, milliseconds since the UNIX epoch.
#[derive(Debug, Default, Clone, Copy)]
#[non_exhaustive]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0.0, |elapsed| elapsed.as_secs_f64() * 1000.0)
    }
}

/// A logical clock that only moves when told to.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct ManualClock {
    /// The current time in milliseconds
    pub millis: f64,
}

impl ManualClock {
    /// Instantiate at the given time.
    #[must_use]
    pub const fn new(millis: f64) -> Self {
        Self { millis }
    }

    /// Move the clock forward.
    pub fn advance(&mut self, millis: f64) {
        self.millis += millis;
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> f64 {
        self.millis
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn manual_clock_only_moves_when_advanced() {
        let mut clock = ManualClock::new(10.0);
        assert!((clock.now_millis() - 10.0).abs() < f64::EPSILON);
        clock.advance(16.5);
        assert!((clock.now_millis() - 26.5).abs() < f64::EPSILON);
    }

    #[test]
    fn system_clock_is_after_the_epoch() {
        assert!(SystemClock.now_millis() > 0.0);
    }
}
