//! Interactive paint session
//!
//! This module connects:
//! - Pointer input (world-space hits from the host's raycaster)
//! - The brush engine (one dab per throttled invocation)
//! - The color store and undo history of the loaded model
//! - Listeners in the host UI (recent colors, undo/redo buttons)
//!
//! The session owns everything mutable, so every paint operation is
//! serialized through `&mut self`.

mod events;
mod gesture;
mod model;
mod throttle;
mod undo;

use glam::{Mat4, Vec3};
use minipainter_config::PainterConfig;
use tracing::{debug, warn};

use crate::brush::BrushEngine;
use crate::color_store::{ColorHistoryRecord, RecentColors};
use crate::types::{BrushParams, PaintAlgorithm, Rgb, Rgb8};
use crate::validation::{ValidationError, validate_color, validate_opacity, validate_radius};

pub use events::SessionEvent;
pub use gesture::PointerButton;
pub use model::{IndexStatus, LoadError};
pub use throttle::Throttle;

use gesture::GestureState;
use model::LoadedModel;

/// Paint session for one viewport
///
/// Usage:
/// 1. Load a mesh with [`load_model`](Self::load_model)
/// 2. Forward pointer events (`pointer_down`, `pointer_move`, `pointer_up`)
///    and call [`tick`](Self::tick) once per frame
/// 3. Upload [`colors`](Self::colors) when `take_dirty` reports a change
pub struct PaintSession {
    pub(crate) config: PainterConfig,
    pub(crate) brush: BrushEngine,
    pub(crate) params: BrushParams,
    pub(crate) material_color: Rgb,
    /// Model world transform
    pub(crate) transform: Mat4,
    /// Cached inverse of `transform`
    pub(crate) world_to_local: Mat4,
    pub(crate) model: Option<LoadedModel>,
    /// Recent colors while no model is loaded
    pub(crate) parked_recent: RecentColors,
    pub(crate) gesture: GestureState,
    #[allow(clippy::type_complexity)]
    event_listeners: Vec<Box<dyn Fn(SessionEvent) + Send + Sync>>,
}

impl std::fmt::Debug for PaintSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaintSession")
            .field("params", &self.params)
            .field("material_color", &self.material_color)
            .field("index_status", &self.index_status())
            .field("painting", &self.is_painting())
            .field("listener_count", &self.event_listeners.len())
            .finish()
    }
}

impl Default for PaintSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PaintSession {
    /// Create a session with default configuration
    pub fn new() -> Self {
        Self::with_config(PainterConfig::default())
    }

    /// Create a session from host configuration
    pub fn with_config(config: PainterConfig) -> Self {
        let params = BrushParams::from(&config.brush);
        if let Err(err) = params.validate() {
            warn!("PaintSession: configured brush defaults are invalid: {}", err);
        }

        let mut parked_recent = RecentColors::new(config.recent_colors);
        parked_recent.push(params.color);

        Self {
            brush: BrushEngine::new(),
            params,
            material_color: Rgb::from_array(config.material_color),
            transform: Mat4::IDENTITY,
            world_to_local: Mat4::IDENTITY,
            model: None,
            parked_recent,
            gesture: GestureState::Idle,
            event_listeners: Vec::new(),
            config,
        }
    }

    /// Replace the brush engine (e.g. a seeded one for reproducible strokes)
    pub fn with_brush_engine(mut self, brush: BrushEngine) -> Self {
        self.brush = brush;
        self
    }

    pub fn config(&self) -> &PainterConfig {
        &self.config
    }

    /// Register a listener for session events
    pub fn add_event_listener<F>(&mut self, listener: F)
    where
        F: Fn(SessionEvent) + Send + Sync + 'static,
    {
        self.event_listeners.push(Box::new(listener));
    }

    pub(crate) fn emit(&self, event: SessionEvent) {
        for listener in &self.event_listeners {
            listener(event.clone());
        }
    }

    pub(crate) fn emit_history_changed(&self) {
        self.emit(SessionEvent::HistoryChanged {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        });
    }

    // Brush settings. Changes made mid-gesture apply from the next dab.

    pub fn brush_params(&self) -> &BrushParams {
        &self.params
    }

    /// Replace all brush settings at once
    pub fn set_brush_params(&mut self, params: BrushParams) -> Result<(), ValidationError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn set_brush_color(&mut self, color: Rgb) -> Result<(), ValidationError> {
        validate_color(color)?;
        self.params.color = color;
        Ok(())
    }

    pub fn set_brush_radius(&mut self, radius: f32) -> Result<(), ValidationError> {
        validate_radius(radius)?;
        self.params.radius = radius;
        Ok(())
    }

    pub fn set_brush_opacity(&mut self, opacity: f32) -> Result<(), ValidationError> {
        validate_opacity(opacity)?;
        self.params.opacity = opacity;
        Ok(())
    }

    pub fn set_algorithm(&mut self, algorithm: PaintAlgorithm) {
        self.params.algorithm = algorithm;
    }

    /// Set the model's world transform. Pointer hits are mapped into model
    /// space with its inverse. Returns false (and keeps the previous
    /// transform) if the matrix is not invertible.
    pub fn set_model_transform(&mut self, transform: Mat4) -> bool {
        let det = transform.determinant();
        if det == 0.0 || !det.is_finite() {
            warn!("set_model_transform: matrix is not invertible, ignoring");
            return false;
        }
        self.transform = transform;
        self.world_to_local = transform.inverse();
        true
    }

    pub fn model_transform(&self) -> Mat4 {
        self.transform
    }

    /// Map a world-space point into model-local space
    pub fn world_to_local(&self, point: Vec3) -> Vec3 {
        self.world_to_local.transform_point3(point)
    }

    // Material

    pub fn material_color(&self) -> Rgb {
        self.material_color
    }

    /// Set the material color, flooding the color buffer unless the mesh has
    /// authored colors. An open gesture is cancelled first. Returns true if
    /// the buffer was recolored.
    pub fn set_material_color(&mut self, color: Rgb) -> Result<bool, ValidationError> {
        validate_color(color)?;
        self.cancel_gesture();
        self.material_color = color;
        Ok(self
            .model
            .as_mut()
            .is_some_and(|model| model.colors.recolor_for_material(color)))
    }

    /// Restore the configured material color and clear both history stacks.
    pub fn reset_material(&mut self) {
        self.cancel_gesture();
        self.material_color = Rgb::from_array(self.config.material_color);
        let Some(model) = self.model.as_mut() else {
            return;
        };
        model.colors.recolor_for_material(self.material_color);
        model.history.clear();
        debug!("reset_material: history cleared");
        self.emit_history_changed();
    }

    // Recent colors

    /// Recently used brush colors, most recent first
    pub fn recent_colors(&self) -> &RecentColors {
        match &self.model {
            Some(model) => model.colors.recent_colors(),
            None => &self.parked_recent,
        }
    }

    /// Replace the recent colors, e.g. with a loaded palette
    pub fn set_recent_colors(&mut self, colors: impl IntoIterator<Item = Rgb8>) {
        match &mut self.model {
            Some(model) => model.colors.restore_history(&ColorHistoryRecord::new(
                colors.into_iter().collect(),
            )),
            None => self.parked_recent.replace(colors),
        }
    }

    /// The color-history record to persist next to an exported model
    pub fn color_history_record(&self) -> ColorHistoryRecord {
        match &self.model {
            Some(model) => model.colors.serialize(),
            None => ColorHistoryRecord::new(self.parked_recent.as_slice().to_vec()),
        }
    }
}
