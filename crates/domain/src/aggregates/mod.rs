//! Aggregate roots - domain objects that own their related data
//!
//! Aggregates expose behavior through methods, not public fields, and report
//! the outcome of mutations as return values.

pub mod playback_queue;

pub use playback_queue::{PlaybackQueue, QueueMove};
