//! Bounded undo history of grid snapshots

use std::collections::VecDeque;

use crate::types::Grid;

/// Maximum number of snapshots kept
pub const UNDO_MAX: usize = 50;

/// Stack of owned grid snapshots, most recent last.
///
/// Snapshots are stored by value so a later mutation of the live grid can
/// never change an entry.
#[derive(Debug, Clone)]
pub struct UndoStack {
    snapshots: VecDeque<Grid>,
    capacity: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_capacity(UNDO_MAX)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a snapshot, discarding the oldest once over capacity
    pub fn push(&mut self, snapshot: Grid) {
        self.snapshots.push_back(snapshot);
        while self.snapshots.len() > self.capacity {
            self.snapshots.pop_front();
        }
    }

    pub fn pop(&mut self) -> Option<Grid> {
        self.snapshots.pop_back()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(v: u8) -> Grid {
        vec![vec![v; 2]; 7]
    }

    #[test]
    fn test_push_pop_lifo() {
        let mut stack = UndoStack::new();
        stack.push(snap(1));
        stack.push(snap(2));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop(), Some(snap(2)));
        assert_eq!(stack.pop(), Some(snap(1)));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_capacity_discards_oldest() {
        let mut stack = UndoStack::new();
        for i in 0..60u8 {
            stack.push(snap(i));
        }
        assert_eq!(stack.len(), UNDO_MAX);

        let mut popped = Vec::new();
        while let Some(s) = stack.pop() {
            popped.push(s[0][0]);
        }
        // Snapshots 0..10 were discarded
        assert_eq!(popped.first(), Some(&59));
        assert_eq!(popped.last(), Some(&10));
    }

    #[test]
    fn test_clear() {
        let mut stack = UndoStack::with_capacity(3);
        stack.push(snap(0));
        stack.clear();
        assert!(stack.is_empty());
    }
}
