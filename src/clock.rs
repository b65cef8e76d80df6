// Monotonic time access for the scheduler core.
//
// The embedding supplies the clock: a hardware timer on target, a
// counter cell in tests. Resolution must be 1 ms or better and the
// value must never go backwards; the epoch is arbitrary.

/// Monotonic microsecond time source.
pub trait Clock {
    /// Microseconds since an arbitrary epoch.
    fn now_us(&self) -> u64;

    /// Milliseconds since the same epoch.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1_000
    }
}

/// [`Clock`] over the embassy-time driver, for targets that already run
/// one. `embassy_time::Delay` supplies the matching `DelayNs` for
/// `run_forever` pacing.
#[cfg(feature = "embassy-time")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy-time")]
impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedClock(u64);

    impl Clock for FixedClock {
        fn now_us(&self) -> u64 {
            self.0
        }
    }

    #[test]
    fn now_ms_derives_from_now_us() {
        assert_eq!(FixedClock(0).now_ms(), 0);
        assert_eq!(FixedClock(999).now_ms(), 0);
        assert_eq!(FixedClock(1_000).now_ms(), 1);
        assert_eq!(FixedClock(1_234_567).now_ms(), 1_234);
    }
}
