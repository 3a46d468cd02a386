//! Value objects - Immutable objects defined by their attributes

mod optimistic;
mod queue_item;
mod sleep_timer;
mod transport;

pub use optimistic::{LikeState, Optimistic};
pub use queue_item::{MediaType, QueueItem, QueueItemMetadata};
pub use sleep_timer::{SleepTimer, SleepTimerMode, SLEEP_TIMER_PRESETS};
pub use transport::TransportState;
