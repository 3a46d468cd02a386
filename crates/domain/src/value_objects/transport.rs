use serde::{Deserialize, Serialize};

use crate::common::sanitize_seconds;

/// Position and duration of the loaded item, in seconds.
///
/// Once the duration is known, `position` always stays in `[0, duration]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransportState {
    position: f64,
    duration: f64,
}

impl TransportState {
    /// Fresh transport for a newly loaded item. `duration_hint` comes from the
    /// source content and is replaced by the engine's first real report.
    pub fn starting(duration_hint: f64) -> Self {
        Self {
            position: 0.0,
            duration: sanitize_seconds(duration_hint),
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_duration_known(&self) -> bool {
        self.duration > 0.0
    }

    /// Apply a periodic engine report. An unknown (zero) duration in the
    /// report keeps the previously known one.
    pub fn with_report(self, position: f64, duration: f64) -> Self {
        let duration = match sanitize_seconds(duration) {
            d if d > 0.0 => d,
            _ => self.duration,
        };
        Self {
            position: clamp_position(position, duration),
            duration,
        }
    }

    pub fn with_position(self, position: f64) -> Self {
        Self {
            position: clamp_position(position, self.duration),
            ..self
        }
    }

    /// Transport parked at the end of the item.
    pub fn at_end(self) -> Self {
        Self {
            position: self.duration,
            ..self
        }
    }

    /// Seconds left in the item; zero when the duration is unknown.
    pub fn remaining(&self) -> f64 {
        (self.duration - self.position).max(0.0)
    }

    /// Fraction played in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.is_duration_known() {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn clamp_position(position: f64, duration: f64) -> f64 {
    let position = sanitize_seconds(position);
    if duration > 0.0 {
        position.min(duration)
    } else {
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_clamps_position_into_duration() {
        let transport = TransportState::starting(0.0).with_report(310.0, 300.0);
        assert_eq!(transport.position(), 300.0);
        assert_eq!(transport.duration(), 300.0);

        let transport = transport.with_report(-4.0, 300.0);
        assert_eq!(transport.position(), 0.0);
    }

    #[test]
    fn unknown_duration_in_report_keeps_hint() {
        let transport = TransportState::starting(120.0).with_report(30.0, f64::NAN);
        assert_eq!(transport.duration(), 120.0);
        assert_eq!(transport.position(), 30.0);
    }

    #[test]
    fn position_is_unbounded_until_duration_is_known() {
        let transport = TransportState::starting(0.0).with_report(45.0, 0.0);
        assert_eq!(transport.position(), 45.0);
        assert_eq!(transport.remaining(), 0.0);
        assert_eq!(transport.progress(), 0.0);
    }

    #[test]
    fn seek_is_clamped() {
        let transport = TransportState::starting(100.0).with_position(250.0);
        assert_eq!(transport.position(), 100.0);
        assert_eq!(transport.remaining(), 0.0);
    }

    #[test]
    fn remaining_and_progress() {
        let transport = TransportState::starting(300.0).with_report(290.0, 300.0);
        assert_eq!(transport.remaining(), 10.0);
        assert!((transport.progress() - 290.0 / 300.0).abs() < f64::EPSILON);
        assert_eq!(transport.at_end().position(), 300.0);
    }
}
