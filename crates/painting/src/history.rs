//! Undo/redo history over sparse per-vertex color edits.
//!
//! One [`PaintTransaction`] is accumulated per brush gesture and sealed into a
//! [`HistoryEntry`] when the gesture ends. Undo writes each diff's previous
//! color back in reverse order; redo writes the new colors forward.

use std::collections::HashMap;

use tracing::debug;

use crate::color_store::ColorStore;
use crate::types::VertexColorDiff;

/// Diffs collected during one open gesture.
///
/// Deduplicated by vertex: the first `previous` color and the latest `new`
/// color win, so undo restores the pre-gesture state exactly.
#[derive(Debug, Clone, Default)]
pub struct PaintTransaction {
    diffs: Vec<VertexColorDiff>,
    slots: HashMap<u32, usize>,
}

impl PaintTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diff, merging with an earlier diff for the same vertex
    pub fn record(&mut self, diff: VertexColorDiff) {
        match self.slots.get(&diff.index) {
            Some(&slot) => self.diffs[slot].new = diff.new,
            None => {
                self.slots.insert(diff.index, self.diffs.len());
                self.diffs.push(diff);
            }
        }
    }

    /// Record every diff from one brush invocation
    pub fn extend(&mut self, diffs: impl IntoIterator<Item = VertexColorDiff>) {
        for diff in diffs {
            self.record(diff);
        }
    }

    pub fn diffs(&self) -> &[VertexColorDiff] {
        &self.diffs
    }

    pub fn contains(&self, index: u32) -> bool {
        self.slots.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }
}

/// A committed, immutable transaction
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// Monotonic id assigned at commit time
    pub id: u64,
    /// Deduplicated diffs in first-touch order
    pub diffs: Vec<VertexColorDiff>,
}

/// Undo and redo stacks for the loaded model
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_undo_levels: Option<usize>,
    next_id: u64,
}

impl History {
    /// History without a depth limit
    pub fn new() -> Self {
        Self::default()
    }

    /// History that drops the oldest entry beyond `max_undo_levels`
    pub fn with_max_undo_levels(max_undo_levels: Option<usize>) -> Self {
        Self {
            max_undo_levels,
            ..Self::default()
        }
    }

    /// Seal and push a transaction, clearing the redo stack.
    ///
    /// Empty transactions are discarded and leave both stacks untouched.
    /// Returns true if an entry was pushed.
    pub fn commit(&mut self, transaction: PaintTransaction) -> bool {
        if transaction.is_empty() {
            debug!("History::commit: empty transaction discarded");
            return false;
        }

        let entry = HistoryEntry {
            id: self.next_id,
            diffs: transaction.diffs,
        };
        self.next_id += 1;

        debug!(
            "History::commit: entry {} ({} vertices)",
            entry.id,
            entry.diffs.len()
        );
        self.redo_stack.clear();
        self.undo_stack.push(entry);

        if let Some(max) = self.max_undo_levels {
            if self.undo_stack.len() > max {
                let excess = self.undo_stack.len() - max;
                self.undo_stack.drain(..excess);
            }
        }
        true
    }

    /// Revert the most recent entry. Returns false if there is nothing to undo.
    pub fn undo(&mut self, colors: &mut ColorStore) -> bool {
        let Some(entry) = self.undo_stack.pop() else {
            debug!("Undo: no entries available");
            return false;
        };

        for diff in entry.diffs.iter().rev() {
            colors.set(diff.index, diff.previous);
        }
        debug!("Undo: entry {} ({} vertices)", entry.id, entry.diffs.len());
        self.redo_stack.push(entry);
        true
    }

    /// Reapply the most recently undone entry. Returns false if there is nothing to redo.
    pub fn redo(&mut self, colors: &mut ColorStore) -> bool {
        let Some(entry) = self.redo_stack.pop() else {
            debug!("Redo: no entries available");
            return false;
        };

        for diff in &entry.diffs {
            colors.set(diff.index, diff.new);
        }
        debug!("Redo: entry {} ({} vertices)", entry.id, entry.diffs.len());
        self.undo_stack.push(entry);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop the redo stack (a new gesture has started)
    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Drop both stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
