//! Playback queue aggregate - ordered items with a cursor.

use std::collections::HashSet;

use serde::Serialize;

use crate::ids::QueueItemId;
use crate::value_objects::QueueItem;

/// Result of asking the queue to move its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueMove {
    /// The cursor moved to this index.
    Moved(usize),
    /// The request fell outside the queue; the cursor did not move.
    AtBoundary,
}

/// Ordered queue of playable items.
///
/// Invariant: when the queue is non-empty, `current` is a valid index. Ids
/// are unique within a queue.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaybackQueue {
    items: Vec<QueueItem>,
    current: usize,
}

impl PlaybackQueue {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(item: QueueItem) -> Self {
        Self {
            items: vec![item],
            current: 0,
        }
    }

    /// Build a queue from a context list, positioned on `current`.
    ///
    /// Duplicate ids keep their first occurrence. If `current` is not part of
    /// the context, the queue degrades to just that item.
    pub fn from_context(current: QueueItem, context: Vec<QueueItem>) -> Self {
        let mut seen = HashSet::new();
        let items: Vec<QueueItem> = context
            .into_iter()
            .filter(|item| seen.insert(item.id().clone()))
            .collect();

        match items.iter().position(|item| item.id() == current.id()) {
            Some(index) => Self {
                items,
                current: index,
            },
            None => Self::single(current),
        }
    }

    pub fn items(&self) -> &[QueueItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<&QueueItem> {
        self.items.get(self.current)
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.current)
    }

    pub fn contains(&self, id: &QueueItemId) -> bool {
        self.items.iter().any(|item| item.id() == id)
    }

    pub fn has_next(&self) -> bool {
        !self.items.is_empty() && self.current + 1 < self.items.len()
    }

    pub fn has_previous(&self) -> bool {
        !self.items.is_empty() && self.current > 0
    }

    /// Move forward one item. No wrap-around at the end.
    pub fn advance(&mut self) -> QueueMove {
        if self.has_next() {
            self.current += 1;
            QueueMove::Moved(self.current)
        } else {
            QueueMove::AtBoundary
        }
    }

    /// Move back one item. No wrap-around at the start.
    pub fn retreat(&mut self) -> QueueMove {
        if self.has_previous() {
            self.current -= 1;
            QueueMove::Moved(self.current)
        } else {
            QueueMove::AtBoundary
        }
    }

    /// Jump to an arbitrary index; out-of-range requests leave the cursor alone.
    pub fn jump_to(&mut self, index: usize) -> QueueMove {
        if index < self.items.len() {
            self.current = index;
            QueueMove::Moved(index)
        } else {
            QueueMove::AtBoundary
        }
    }
}
