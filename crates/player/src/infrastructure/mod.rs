//! Infrastructure adapters: configuration, clock, the simulated audio engine
//! and play request parsing for the binary.

pub mod clock;
pub mod config;
pub mod play_request;
pub mod simulated_engine;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use clock::SystemClock;
pub use config::PlayerConfig;
pub use play_request::{PlayContent, PlayRequest, PlaybackPlan};
pub use simulated_engine::SimulatedAudioEngine;
