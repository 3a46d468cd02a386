//! System clock adapter

use chrono::{DateTime, Utc};

use crate::ports::outbound::ClockPort;

/// Real wall-clock time. Tests use `MockClockPort` or `TokioClock` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
