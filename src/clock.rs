use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Source of "now", injectable so trading-day resolution is deterministic in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current wall-clock time at the exchange.
    fn now_in(&self, tz: Tz) -> DateTime<Tz> {
        self.now().with_timezone(&tz)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_fixed_clock_in_exchange_timezone() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2020, 1, 15, 7, 45, 0).unwrap());
        let local = clock.now_in(chrono_tz::Europe::Berlin);
        assert_eq!(local.hour(), 8);
        assert_eq!(local.minute(), 45);
    }
}
