//! Clock abstraction port
//!
//! Services that need wall-clock time inject this port rather than calling
//! `Utc::now()` directly, so sleep timer countdowns and notification
//! timestamps are deterministic in tests.

use chrono::{DateTime, Utc};

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
