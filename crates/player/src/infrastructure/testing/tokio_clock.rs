use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tokio::time::Instant;

use crate::ports::outbound::ClockPort;

/// Wall clock anchored at a fixed instant that advances with tokio time.
///
/// Under `#[tokio::test(start_paused = true)]` this keeps `ClockPort::now()`
/// in step with `tokio::time::advance`, so sleep timer end times and
/// countdowns line up with the timers that fire them.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    anchor: DateTime<Utc>,
    started: Instant,
}

impl TokioClock {
    pub fn new(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor,
            started: Instant::now(),
        }
    }

    /// Anchored at 2025-06-15 22:00:00 UTC.
    pub fn evening() -> Self {
        Self::new(
            Utc.with_ymd_and_hms(2025, 6, 15, 22, 0, 0)
                .single()
                .unwrap_or_default(),
        )
    }

    pub fn anchor(&self) -> DateTime<Utc> {
        self.anchor
    }
}

impl ClockPort for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.started.elapsed()).unwrap_or(TimeDelta::MAX);
        self.anchor
            .checked_add_signed(elapsed)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
