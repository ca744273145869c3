//! Events emitted by a paint session for the host UI.

use crate::types::Rgb;

/// Events emitted by [`PaintSession`](super::PaintSession).
///
/// Listeners receive cloned events and must not call back into the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A brush invocation painted with this color (fires once per dab).
    ColorUsed { color: Rgb },
    /// Undo/redo availability may have changed.
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// A new model replaced the previous one.
    ModelLoaded {
        vertex_count: usize,
        authored_colors: bool,
    },
    /// A background index build finished and painting is enabled.
    IndexReady { point_count: usize },
    /// The model was dropped; painting is disabled.
    ModelUnloaded,
}
