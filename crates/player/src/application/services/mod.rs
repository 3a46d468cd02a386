//! Application services
//!
//! Use cases for the Ridecast player. Services depend on port traits, not
//! concrete infrastructure implementations.

pub mod auth_status;
pub mod interactions;
pub mod notification_center;
pub mod playback_session;

pub use auth_status::{AuthStatus, AuthStatusMonitor};
pub use interactions::{FollowToggle, InteractionOutcome, LikeToggle, PlayCountRecorder};
pub use notification_center::{Notification, NotificationCenter, NotificationId, NotificationLevel};
pub use playback_session::{LoadOutcome, PlaybackSession, PlaybackSnapshot, SessionConfig};
