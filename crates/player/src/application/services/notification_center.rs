//! Transient, dismissible notifications.
//!
//! Failures from the session and the interaction helpers are surfaced here
//! instead of interrupting playback. Notifications queue in arrival order and
//! subscribers only ever see the head of the queue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use crate::application::error::{InteractionError, SessionError};
use crate::ports::outbound::ClockPort;

/// Oldest notifications are dropped beyond this many.
const MAX_QUEUED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

pub struct NotificationCenter {
    clock: Arc<dyn ClockPort>,
    queue: Mutex<VecDeque<Notification>>,
    head: watch::Sender<Option<Notification>>,
}

impl NotificationCenter {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        let (head, _) = watch::channel(None);
        Self {
            clock,
            queue: Mutex::new(VecDeque::new()),
            head,
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Notification>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn notify(&self, level: NotificationLevel, message: impl Into<String>) -> NotificationId {
        let notification = Notification {
            id: NotificationId::new(),
            level,
            message: message.into(),
            created_at: self.clock.now(),
        };
        match level {
            NotificationLevel::Error => tracing::warn!(message = %notification.message, "Notify"),
            NotificationLevel::Info => tracing::info!(message = %notification.message, "Notify"),
        }

        let id = notification.id;
        let mut queue = self.lock();
        queue.push_back(notification);
        while queue.len() > MAX_QUEUED {
            queue.pop_front();
        }
        self.publish(&queue);
        id
    }

    pub fn notify_info(&self, message: impl Into<String>) -> NotificationId {
        self.notify(NotificationLevel::Info, message)
    }

    pub fn notify_error(&self, message: impl Into<String>) -> NotificationId {
        self.notify(NotificationLevel::Error, message)
    }

    pub fn report_session_error(&self, error: &SessionError) -> NotificationId {
        self.notify_error(error.user_message())
    }

    pub fn report_interaction_error(&self, error: &InteractionError) -> NotificationId {
        self.notify_error(error.user_message())
    }

    /// The notification currently on screen.
    pub fn current(&self) -> Option<Notification> {
        self.lock().front().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove a notification. Returns false if it was already gone.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut queue = self.lock();
        let before = queue.len();
        queue.retain(|notification| notification.id != id);
        let removed = queue.len() != before;
        if removed {
            self.publish(&queue);
        }
        removed
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.head.subscribe()
    }

    fn publish(&self, queue: &VecDeque<Notification>) {
        self.head.send_replace(queue.front().cloned());
    }
}
