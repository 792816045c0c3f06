//! Narration units and the FIFO queue the driver consumes.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// One atomic piece of text to be spoken, tied to a UI element id.
///
/// Units are immutable once created; a new screen produces an entirely new set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NarrationUnit {
    /// Stable key of the UI element (e.g. `"question-text"`, `"option-2"`).
    pub id: String,

    /// Literal text handed to the speech synthesizer.
    pub text: String,
}

impl NarrationUnit {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Ordered sequence of units in reading order.
///
/// The head is the unit currently being fetched or played, or about to be.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarrationQueue {
    units: VecDeque<NarrationUnit>,
}

impl NarrationQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The unit at the head of the queue.
    #[must_use]
    pub fn head(&self) -> Option<&NarrationUnit> {
        self.units.front()
    }

    /// The unit right after the head (pre-fetch candidate).
    #[must_use]
    pub fn peek_next(&self) -> Option<&NarrationUnit> {
        self.units.get(1)
    }

    pub fn push(&mut self, unit: NarrationUnit) {
        self.units.push_back(unit);
    }

    pub fn pop_head(&mut self) -> Option<NarrationUnit> {
        self.units.pop_front()
    }

    /// Pop the head only if it is the unit with `id`.
    ///
    /// Returns `true` when something was popped.
    pub fn pop_if_head(&mut self, id: &str) -> bool {
        if self.head().is_some_and(|unit| unit.id == id) {
            self.units.pop_front();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.units.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NarrationUnit> {
        self.units.iter()
    }

    /// Ids in reading order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.units.iter().map(|unit| unit.id.as_str()).collect()
    }
}

impl FromIterator<NarrationUnit> for NarrationQueue {
    fn from_iter<I: IntoIterator<Item = NarrationUnit>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(ids: &[&str]) -> NarrationQueue {
        ids.iter()
            .map(|id| NarrationUnit::new(*id, format!("text of {id}")))
            .collect()
    }

    #[test]
    fn head_and_next_follow_insertion_order() {
        let q = queue(&["title", "question-text", "option-0"]);
        assert_eq!(q.head().map(|u| u.id.as_str()), Some("title"));
        assert_eq!(q.peek_next().map(|u| u.id.as_str()), Some("question-text"));
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn pop_if_head_ignores_other_ids() {
        let mut q = queue(&["a", "b"]);
        assert!(!q.pop_if_head("b"));
        assert_eq!(q.ids(), vec!["a", "b"]);

        assert!(q.pop_if_head("a"));
        assert_eq!(q.ids(), vec!["b"]);
    }

    #[test]
    fn pop_if_head_on_empty_queue() {
        let mut q = NarrationQueue::new();
        assert!(!q.pop_if_head("a"));
        assert!(q.is_empty());
    }

    #[test]
    fn clear_empties_queue() {
        let mut q = queue(&["a", "b", "c"]);
        q.clear();
        assert!(q.is_empty());
        assert!(q.head().is_none());
    }
}
