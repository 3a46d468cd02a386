//! Ridecast player crate.
//!
//! Application logic and adapters for the unified audio player:
//!
//! - `ports/` - traits for the audio engine, social API, clock and auth tokens
//! - `application/` - the playback session, interaction helpers,
//!   notifications and auth status monitor
//! - `presentation/` - view-models for the mini player, full player and
//!   inline play buttons
//! - `infrastructure/` - config, system clock, simulated engine, and test fakes

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod presentation;

pub use application::error::{InteractionError, SessionError};
pub use application::services::{
    LoadOutcome, NotificationCenter, PlaybackSession, PlaybackSnapshot, SessionConfig,
};
