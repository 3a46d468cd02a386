//! Sleep timer values.
//!
//! Scheduling lives in the player crate; this module only decides *when*
//! a timer should end and answers countdown questions.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::TransportState;

/// Minute presets offered by the player surfaces, in display order.
pub const SLEEP_TIMER_PRESETS: [u32; 6] = [5, 10, 15, 30, 45, 60];

/// How a sleep timer was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepTimerMode {
    Minutes(u32),
    /// Stop when the current item finishes, measured once at arming time.
    EndOfTrack,
}

impl SleepTimerMode {
    /// Delay until the timer should fire, or `None` when there is nothing to
    /// arm (zero minutes, or no time left in the current track).
    pub fn delay(&self, transport: &TransportState) -> Option<Duration> {
        match self {
            SleepTimerMode::Minutes(0) => None,
            SleepTimerMode::Minutes(minutes) => {
                Some(Duration::from_secs(u64::from(*minutes) * 60))
            }
            SleepTimerMode::EndOfTrack => {
                let remaining = transport.remaining();
                if remaining > 0.0 {
                    Duration::try_from_secs_f64(remaining).ok()
                } else {
                    None
                }
            }
        }
    }
}

/// An armed sleep timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SleepTimer {
    end_time: DateTime<Utc>,
}

impl SleepTimer {
    /// Arm a timer `delay` after `now`. Returns `None` if the end time would
    /// overflow the calendar.
    pub fn arm(now: DateTime<Utc>, delay: Duration) -> Option<Self> {
        let delta = TimeDelta::from_std(delay).ok()?;
        let end_time = now.checked_add_signed(delta)?;
        Some(Self { end_time })
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Time left before the timer fires; zero once due.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.end_time - now).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_time
    }
}
