//! Test utilities for the player crate
//!
//! Hand-written fakes for ports whose behaviour tests need to script over
//! time. Port traits with plain request/response shapes use mockall's
//! generated `Mock*` types instead.
//!
//! Available under `cfg(test)` and with the `testing` feature.

mod fake_audio_engine;
pub mod fixtures;
mod tokio_clock;

pub use fake_audio_engine::{EngineCall, FakeAudioEngine};
pub use tokio_clock::TokioClock;
