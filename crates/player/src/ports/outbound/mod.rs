//! Outbound ports - Interfaces for external collaborators
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to drive the audio engine, the social backend,
//! the clock and the token store without depending on concrete implementations.

pub mod audio_engine_port;
pub mod auth_token_port;
pub mod clock_port;
pub mod social_api_port;

pub use audio_engine_port::{
    AudioEnginePort, EngineError, EngineEvent, EngineEventKind, SourceHandle,
};
pub use auth_token_port::AuthTokenPort;
pub use clock_port::ClockPort;
pub use social_api_port::{ApiError, SocialApiPort, GENERIC_ERROR_MESSAGE};

#[cfg(test)]
pub use auth_token_port::MockAuthTokenPort;
#[cfg(test)]
pub use clock_port::MockClockPort;
#[cfg(test)]
pub use social_api_port::MockSocialApiPort;
