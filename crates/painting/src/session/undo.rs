//! Undo/redo for the paint session

use tracing::debug;

use super::PaintSession;

impl PaintSession {
    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.model.as_ref().is_some_and(|m| m.history.can_undo())
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.model.as_ref().is_some_and(|m| m.history.can_redo())
    }

    /// Undo the last committed gesture
    ///
    /// Returns false if nothing was undone: no model is loaded, the undo
    /// stack is empty, or a gesture is still open.
    pub fn undo(&mut self) -> bool {
        if self.is_painting() {
            debug!("Undo: gesture in progress, ignoring");
            return false;
        }
        let Some(model) = self.model.as_mut() else {
            debug!("Undo: no model loaded");
            return false;
        };

        let undone = model.history.undo(&mut model.colors);
        if undone {
            self.emit_history_changed();
        }
        undone
    }

    /// Redo the last undone gesture
    ///
    /// Returns false under the same conditions as [`Self::undo`].
    pub fn redo(&mut self) -> bool {
        if self.is_painting() {
            debug!("Redo: gesture in progress, ignoring");
            return false;
        }
        let Some(model) = self.model.as_mut() else {
            debug!("Redo: no model loaded");
            return false;
        };

        let redone = model.history.redo(&mut model.colors);
        if redone {
            self.emit_history_changed();
        }
        redone
    }

    /// Get the number of undo levels available
    pub fn undo_count(&self) -> usize {
        self.model.as_ref().map_or(0, |m| m.history.undo_count())
    }
}
