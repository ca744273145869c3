//! Shared configuration for MiniPainter
//!
//! This crate provides the single source of truth for brush defaults,
//! material defaults, and paint-session tuning shared by the painting engine
//! and the host application.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default brush color (pure red), RGB 0.0-1.0
pub const DEFAULT_BRUSH_COLOR: [f32; 3] = [1.0, 0.0, 0.0];

/// Default brush radius in model units
pub const DEFAULT_BRUSH_RADIUS: f32 = 1.5;

/// Default brush opacity
pub const DEFAULT_BRUSH_OPACITY: f32 = 0.75;

/// Default material color (white), RGB 0.0-1.0
pub const DEFAULT_MATERIAL_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Minimum time between throttled brush invocations while dragging
pub const DEFAULT_THROTTLE_MS: u64 = 30;

/// Number of recently used colors remembered per session
pub const DEFAULT_RECENT_COLORS: usize = 20;

/// Brush settings applied when a session starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushDefaults {
    /// Brush color as RGB (0.0-1.0)
    pub color: [f32; 3],
    /// Brush radius in model units
    pub radius: f32,
    /// Brush opacity in (0.0, 1.0]
    pub opacity: f32,
}

impl Default for BrushDefaults {
    fn default() -> Self {
        Self {
            color: DEFAULT_BRUSH_COLOR,
            radius: DEFAULT_BRUSH_RADIUS,
            opacity: DEFAULT_BRUSH_OPACITY,
        }
    }
}

/// Configuration for a paint session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainterConfig {
    /// Initial brush settings
    pub brush: BrushDefaults,
    /// Material color used to initialize meshes without authored colors
    pub material_color: [f32; 3],
    /// Throttle window for pointer-move painting, in milliseconds
    pub throttle_ms: u64,
    /// Capacity of the recent-colors palette
    pub recent_colors: usize,
    /// Optional cap on undo depth. `None` keeps every transaction.
    pub max_undo_levels: Option<usize>,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            brush: BrushDefaults::default(),
            material_color: DEFAULT_MATERIAL_COLOR,
            throttle_ms: DEFAULT_THROTTLE_MS,
            recent_colors: DEFAULT_RECENT_COLORS,
            max_undo_levels: None,
        }
    }
}

impl PainterConfig {
    /// Get the throttle window as a [`Duration`]
    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Set the undo cap, returning the updated config
    pub fn with_max_undo_levels(mut self, levels: usize) -> Self {
        self.max_undo_levels = Some(levels);
        self
    }
}
