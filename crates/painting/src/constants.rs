/// Maximum brightness jitter for the metallic brush (+/- half of this).
pub const SPARKLE_INTENSITY: f32 = 0.3;

/// Fraction of the brightness excess used to tint metallic sparkles toward white.
pub const SPARKLE_WHITE_BLEND: f32 = 0.5;

/// Maximum number of neighbors sampled when estimating crease intensity.
pub const CREASE_NEIGHBOR_SAMPLES: usize = 8;

/// Normal angle (degrees) above which a neighbor counts as a crease for wash.
pub const WASH_ANGLE_THRESHOLD: f32 = 45.0;

/// Wash opacity at or below this value leaves the vertex untouched.
pub const WASH_MIN_OPACITY: f32 = 0.005;

/// Wash opacity at full crease intensity.
pub const WASH_MAX_OPACITY: f32 = 0.5;

/// Normal angle (degrees) below which a neighbor counts as a raised edge for dry brush.
pub const DRY_BRUSH_ANGLE_THRESHOLD: f32 = 70.0;

/// Dry brush opacity floor. Opacity must exceed this to paint.
pub const DRY_BRUSH_MIN_OPACITY: f32 = 0.2;

/// Dry brush opacity scale applied to edge intensity.
pub const DRY_BRUSH_OPACITY_SCALE: f32 = 0.35;

/// Leaf size for the vertex BVH.
pub const BVH_LEAF_SIZE: usize = 8;
