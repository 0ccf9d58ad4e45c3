//! Bounded undo/redo stacks of whole-document snapshots.

use super::record_store::StoreDocument;
use std::collections::VecDeque;

pub(crate) const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub(crate) struct History {
    past: VecDeque<StoreDocument>,
    future: Vec<StoreDocument>,
    capacity: usize,
}

impl History {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            capacity,
        }
    }

    /// Records the state a mutation replaced. Clears the redo stack.
    pub(crate) fn record(&mut self, previous: StoreDocument) {
        self.future.clear();
        if self.capacity == 0 {
            return;
        }
        if self.past.len() == self.capacity {
            self.past.pop_front();
        }
        self.past.push_back(previous);
    }

    pub(crate) fn peek_undo(&self) -> Option<&StoreDocument> {
        self.past.back()
    }

    pub(crate) fn peek_redo(&self) -> Option<&StoreDocument> {
        self.future.last()
    }

    /// Moves one step back; `current` becomes redoable.
    pub(crate) fn commit_undo(&mut self, current: StoreDocument) {
        if self.past.pop_back().is_some() {
            self.future.push(current);
        }
    }

    /// Moves one step forward; `current` becomes undoable.
    pub(crate) fn commit_redo(&mut self, current: StoreDocument) {
        if self.future.pop().is_some() {
            self.past.push_back(current);
        }
    }

    pub(crate) fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub(crate) fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
