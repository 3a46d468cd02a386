//! Common utility functions shared by the domain and the player crate.
//!
//! # Design Principles
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **Never fail on upstream data** - malformed values normalize to a safe default

pub mod duration;

// Re-export commonly used functions at crate root for convenience
pub use duration::{format_duration, parse_duration, sanitize_seconds, RawDuration};
