//! Pointer gesture handling for the paint session

use std::time::Instant;

use glam::Vec3;
use tracing::{debug, warn};

use crate::history::PaintTransaction;

use super::model::LoadedModel;
use super::{PaintSession, SessionEvent, Throttle};

/// Pointer button reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Paints
    Primary,
    /// Left to the host (camera controls)
    Secondary,
    Middle,
}

/// Idle, or painting with an open transaction
#[derive(Debug, Default)]
pub(crate) enum GestureState {
    #[default]
    Idle,
    Painting {
        transaction: PaintTransaction,
        throttle: Throttle,
    },
}

impl PaintSession {
    /// Begin a gesture and paint once at `world_point`.
    ///
    /// Only the primary button paints. Starting a gesture clears the redo
    /// stack. Returns true if a gesture was started.
    pub fn pointer_down(&mut self, button: PointerButton, world_point: Vec3, now: Instant) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        if self.is_painting() {
            debug!("pointer_down: gesture already active, ignoring");
            return false;
        }
        let Some(model) = self.model.as_mut() else {
            debug!("pointer_down: no model loaded, ignoring");
            return false;
        };

        let had_redo = model.history.can_redo();
        model.history.clear_redo();

        let mut throttle = Throttle::new(self.config.throttle_interval());
        throttle.mark_fired(now);
        self.gesture = GestureState::Painting {
            transaction: PaintTransaction::new(),
            throttle,
        };

        if had_redo {
            self.emit_history_changed();
        }
        self.dab(world_point);
        true
    }

    /// Continue the gesture. Painting is throttled; positions inside the
    /// throttle window are deferred to [`Self::tick`] or the gesture end.
    pub fn pointer_move(&mut self, world_point: Vec3, now: Instant) {
        let GestureState::Painting { throttle, .. } = &mut self.gesture else {
            return;
        };
        if let Some(point) = throttle.offer(world_point, now) {
            self.dab(point);
        }
    }

    /// Per-frame update: paints a deferred pointer position once its
    /// throttle window has elapsed, and picks up background index builds.
    pub fn tick(&mut self, now: Instant) {
        self.poll_index();
        let GestureState::Painting { throttle, .. } = &mut self.gesture else {
            return;
        };
        if let Some(point) = throttle.poll(now) {
            self.dab(point);
        }
    }

    /// End the gesture, committing its transaction if anything changed
    pub fn pointer_up(&mut self) {
        self.end_gesture();
    }

    /// The pointer left the viewport; ends the gesture like a release
    pub fn pointer_leave(&mut self) {
        self.end_gesture();
    }

    pub fn is_painting(&self) -> bool {
        matches!(self.gesture, GestureState::Painting { .. })
    }

    /// Abort the gesture: drop any deferred position and revert what the
    /// gesture painted so far. Nothing is committed.
    pub fn cancel_gesture(&mut self) {
        let GestureState::Painting { transaction, .. } = std::mem::take(&mut self.gesture) else {
            return;
        };
        if let Some(model) = self.model.as_mut() {
            for diff in transaction.diffs().iter().rev() {
                model.colors.set(diff.index, diff.previous);
            }
        }
        debug!("Gesture cancelled ({} vertices reverted)", transaction.len());
    }

    fn end_gesture(&mut self) {
        let pending = match &mut self.gesture {
            GestureState::Painting { throttle, .. } => throttle.flush(),
            GestureState::Idle => return,
        };
        if let Some(point) = pending {
            self.dab(point);
        }

        let GestureState::Painting { transaction, .. } = std::mem::take(&mut self.gesture) else {
            return;
        };
        let Some(model) = self.model.as_mut() else {
            return;
        };

        let vertex_count = transaction.len();
        if model.history.commit(transaction) {
            debug!("Gesture committed ({} vertices)", vertex_count);
            self.emit_history_changed();
        }
    }

    /// One brush invocation at a world-space point
    fn dab(&mut self, world_point: Vec3) {
        self.poll_index();
        let local = self.world_to_local(world_point);

        let Some(model) = self.model.as_mut() else {
            return;
        };
        let GestureState::Painting { transaction, .. } = &mut self.gesture else {
            return;
        };
        let LoadedModel {
            mesh,
            index,
            colors,
            ..
        } = model;
        let index = index.ready();
        let painted = index.is_some();

        match self
            .brush
            .apply(mesh, index, &self.params, local, colors)
        {
            Ok(diffs) => transaction.extend(diffs),
            Err(err) => {
                warn!("Brush invocation rejected: {}", err);
                return;
            }
        }

        if painted {
            colors.note_color_used(self.params.color);
            self.emit(SessionEvent::ColorUsed {
                color: self.params.color,
            });
        }
    }
}
