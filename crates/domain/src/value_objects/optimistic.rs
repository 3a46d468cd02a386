//! Optimistic mutation state machine.
//!
//! `Idle -> Pending -> (confirmed | rolled back) -> Idle`. The value shown
//! while pending is the optimistic one; the value captured when the mutation
//! began is kept so a rollback restores it exactly.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Optimistic<T> {
    Idle { value: T },
    Pending { optimistic: T, previous: T },
}

impl<T: Clone> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Self::Idle { value }
    }

    /// The value to display right now.
    pub fn value(&self) -> &T {
        match self {
            Self::Idle { value } => value,
            Self::Pending { optimistic, .. } => optimistic,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Apply `next` optimistically.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if a mutation is already pending.
    pub fn begin(&mut self, next: T) -> Result<(), DomainError> {
        match self {
            Self::Pending { .. } => Err(DomainError::invalid_transition(
                "an optimistic mutation is already pending",
            )),
            Self::Idle { value } => {
                let previous = value.clone();
                *self = Self::Pending {
                    optimistic: next,
                    previous,
                };
                Ok(())
            }
        }
    }

    /// Settle a pending mutation as accepted. A server-provided value wins over
    /// the optimistic one; without it the optimistic value stays.
    pub fn confirm(&mut self, confirmed: Option<T>) -> &T {
        if let Self::Pending { optimistic, .. } = self {
            let value = confirmed.unwrap_or_else(|| optimistic.clone());
            *self = Self::Idle { value };
        }
        self.value()
    }

    /// Settle a pending mutation as rejected, restoring the pre-mutation value.
    pub fn rollback(&mut self) -> &T {
        if let Self::Pending { previous, .. } = self {
            let value = previous.clone();
            *self = Self::Idle { value };
        }
        self.value()
    }

    /// Replace the value with fresh server state. Ignored while a mutation is
    /// pending, since its settlement will decide the value.
    pub fn refresh(&mut self, value: T) -> bool {
        match self {
            Self::Idle { .. } => {
                *self = Self::Idle { value };
                true
            }
            Self::Pending { .. } => false,
        }
    }
}

/// Like status of a post as shown next to the heart button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub liked: bool,
    pub count: u64,
}

impl LikeState {
    pub fn new(liked: bool, count: u64) -> Self {
        Self { liked, count }
    }

    /// The state after the user taps the heart.
    pub fn toggled(self) -> Self {
        if self.liked {
            Self {
                liked: false,
                count: self.count.saturating_sub(1),
            }
        } else {
            Self {
                liked: true,
                count: self.count.saturating_add(1),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_shows_optimistic_value() {
        let mut following = Optimistic::new(false);
        following.begin(true).unwrap();

        assert!(following.is_pending());
        assert!(*following.value());
    }

    #[test]
    fn second_begin_is_rejected_while_pending() {
        let mut following = Optimistic::new(false);
        following.begin(true).unwrap();

        let err = following.begin(false).unwrap_err();
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
        assert!(*following.value());
    }

    #[test]
    fn rollback_restores_exact_previous_value() {
        let mut likes = Optimistic::new(LikeState::new(false, 41));
        likes.begin(likes.value().toggled()).unwrap();
        assert_eq!(*likes.value(), LikeState::new(true, 42));

        assert_eq!(*likes.rollback(), LikeState::new(false, 41));
        assert!(!likes.is_pending());
    }

    #[test]
    fn confirm_prefers_server_value() {
        let mut count = Optimistic::new(10_u64);
        count.begin(11).unwrap();
        assert_eq!(*count.confirm(Some(15)), 15);

        count.begin(16).unwrap();
        assert_eq!(*count.confirm(None), 16);
    }

    #[test]
    fn refresh_is_ignored_while_pending() {
        let mut following = Optimistic::new(false);
        following.begin(true).unwrap();
        assert!(!following.refresh(false));
        assert!(*following.value());

        following.confirm(None);
        assert!(following.refresh(false));
        assert!(!*following.value());
    }

    #[test]
    fn unlike_never_underflows() {
        assert_eq!(LikeState::new(true, 0).toggled(), LikeState::new(false, 0));
    }
}
