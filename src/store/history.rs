//! Bounded snapshot history.

use std::collections::VecDeque;

/// Snapshots retained on the undo side before the oldest is dropped.
pub const MAX_HISTORY: usize = 50;

/// Undo/redo stacks of whole-value snapshots.
///
/// The newest entry sits at the back of both deques.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: VecDeque<T>,
    future: VecDeque<T>,
    limit: usize,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

impl<T> History<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    /// Records the state as it was before an edit and forgets the redo side.
    pub fn record(&mut self, snapshot: T) {
        self.push_past(snapshot);
        self.future.clear();
    }

    /// Steps back. `current` moves to the redo side and the previous
    /// snapshot is returned, or `current` is handed back untouched when there
    /// is nothing to undo.
    pub fn undo(&mut self, current: T) -> Result<T, T> {
        match self.past.pop_back() {
            Some(previous) => {
                self.future.push_back(current);
                Ok(previous)
            }
            None => Err(current),
        }
    }

    /// Mirror of [`History::undo`].
    pub fn redo(&mut self, current: T) -> Result<T, T> {
        match self.future.pop_back() {
            Some(next) => {
                self.push_past(current);
                Ok(next)
            }
            None => Err(current),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn push_past(&mut self, snapshot: T) {
        self.past.push_back(snapshot);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_cycle() {
        let mut history = History::new(10);
        let mut value = 0;
        for next in 1..=3 {
            history.record(value);
            value = next;
        }

        for expected in [2, 1, 0] {
            value = history.undo(value).unwrap();
            assert_eq!(value, expected);
        }
        assert_eq!(history.undo(value), Err(0));

        for expected in [1, 2, 3] {
            value = history.redo(value).unwrap();
            assert_eq!(value, expected);
        }
        assert!(!history.can_redo());
        assert_eq!(history.undo_depth(), 3);
    }

    #[test]
    fn record_clears_future() {
        let mut history = History::new(10);
        history.record("a");
        let current = history.undo("b").unwrap();
        assert!(history.can_redo());
        history.record(current);
        assert!(!history.can_redo());
    }

    #[test]
    fn oldest_snapshot_is_dropped() {
        let mut history = History::new(3);
        for i in 0..5 {
            history.record(i);
        }
        assert_eq!(history.undo_depth(), 3);
        let mut value = 5;
        let mut seen = Vec::new();
        while let Ok(prev) = history.undo(value) {
            value = prev;
            seen.push(prev);
        }
        assert_eq!(seen, vec![4, 3, 2]);
    }
}
