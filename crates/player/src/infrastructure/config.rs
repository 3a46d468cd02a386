//! Player configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::services::SessionConfig;

/// Player configuration loaded from environment
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// How often the simulated engine reports progress
    pub progress_interval: Duration,
    /// Playback session behaviour
    pub session: SessionConfig,
    /// Sleep timer preset highlighted by the full player
    pub default_sleep_minutes: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_millis(500),
            session: SessionConfig::default(),
            default_sleep_minutes: 30,
        }
    }
}

impl PlayerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str, default: String| lookup(key).unwrap_or(default);

        let progress_ms: u64 = var("RIDECAST_PROGRESS_INTERVAL_MS", "500".to_string())
            .trim()
            .parse()
            .context("RIDECAST_PROGRESS_INTERVAL_MS must be a whole number of milliseconds")?;
        if progress_ms == 0 {
            anyhow::bail!("RIDECAST_PROGRESS_INTERVAL_MS must be greater than zero");
        }

        let skip_previous_restart_secs: f64 = var(
            "RIDECAST_SKIP_PREVIOUS_RESTART_SECS",
            defaults.session.skip_previous_restart_secs.to_string(),
        )
        .trim()
        .parse()
        .context("RIDECAST_SKIP_PREVIOUS_RESTART_SECS must be a number of seconds")?;
        if !skip_previous_restart_secs.is_finite() || skip_previous_restart_secs < 0.0 {
            anyhow::bail!("RIDECAST_SKIP_PREVIOUS_RESTART_SECS must be zero or positive");
        }

        Ok(Self {
            progress_interval: Duration::from_millis(progress_ms),

            session: SessionConfig {
                auto_advance: parse_flag(&var(
                    "RIDECAST_AUTO_ADVANCE",
                    defaults.session.auto_advance.to_string(),
                ))
                .context("RIDECAST_AUTO_ADVANCE must be true or false")?,
                skip_previous_restart_secs,
                command_buffer: var(
                    "RIDECAST_COMMAND_BUFFER",
                    defaults.session.command_buffer.to_string(),
                )
                .trim()
                .parse()
                .context("RIDECAST_COMMAND_BUFFER must be a positive integer")?,
            },

            default_sleep_minutes: var(
                "RIDECAST_DEFAULT_SLEEP_MINUTES",
                defaults.default_sleep_minutes.to_string(),
            )
            .trim()
            .parse()
            .context("RIDECAST_DEFAULT_SLEEP_MINUTES must be a whole number of minutes")?,
        })
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("unrecognised flag value {other:?}"),
    }
}
