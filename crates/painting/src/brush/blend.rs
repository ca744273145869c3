//! Per-vertex color blending for each paint algorithm.
//!
//! Wash and dry brush look at how much a vertex normal diverges from the
//! normals of sampled neighbors inside the brush. Wash pools paint where
//! normals meet at sharp angles (creases); dry brush catches vertices whose
//! neighbors face the same way (raised, flat-topped detail).

use glam::Vec3;

use crate::constants::{
    CREASE_NEIGHBOR_SAMPLES, DRY_BRUSH_ANGLE_THRESHOLD, DRY_BRUSH_MIN_OPACITY,
    DRY_BRUSH_OPACITY_SCALE, SPARKLE_INTENSITY, SPARKLE_WHITE_BLEND, WASH_ANGLE_THRESHOLD,
    WASH_MAX_OPACITY, WASH_MIN_OPACITY,
};
use crate::mesh::Mesh;
use crate::types::Rgb;

/// Linear blend toward the brush color.
#[inline]
pub fn basic(previous: Rgb, brush: Rgb, opacity: f32) -> Rgb {
    previous.lerp(brush, opacity)
}

/// Brush color with a brightness jitter of +/-15%.
///
/// `jitter` is a uniform sample in [0, 1). Brighter samples are also tinted
/// toward white so highlights read as sparkle rather than saturation.
pub fn metallic(brush: Rgb, jitter: f32) -> Rgb {
    let brightness = 1.0 + (jitter - 0.5) * SPARKLE_INTENSITY;
    let mut color = brush;
    if brightness > 1.0 {
        color = color.lerp(Rgb::WHITE, (brightness - 1.0) * SPARKLE_WHITE_BLEND);
    }
    color.scale(brightness).clamped()
}

/// Angle between two unit normals in degrees.
#[inline]
pub fn normal_angle_degrees(a: Vec3, b: Vec3) -> f32 {
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Up to [`CREASE_NEIGHBOR_SAMPLES`] neighbors, evenly strided through
/// `candidates`, skipping `vertex` itself.
pub fn sample_neighbors(candidates: &[u32], vertex: u32) -> impl Iterator<Item = u32> + '_ {
    let stride = candidates.len().div_ceil(CREASE_NEIGHBOR_SAMPLES).max(1);
    candidates
        .iter()
        .step_by(stride)
        .copied()
        .filter(move |&j| j != vertex)
        .take(CREASE_NEIGHBOR_SAMPLES)
}

/// Average per-neighbor contribution of the normal angle, clamped to [0, 1].
fn angle_intensity(
    mesh: &Mesh,
    vertex: u32,
    candidates: &[u32],
    contribution: impl Fn(f32) -> f32,
) -> f32 {
    let normal = mesh.normal(vertex);
    let mut total = 0.0;
    let mut samples = 0usize;

    for neighbor in sample_neighbors(candidates, vertex) {
        total += contribution(normal_angle_degrees(normal, mesh.normal(neighbor)));
        samples += 1;
    }

    if samples == 0 {
        return 0.0;
    }
    (total / samples as f32).clamp(0.0, 1.0)
}

/// Crease intensity: neighbors past 45 degrees contribute, peaking at 90.
pub fn crease_intensity(mesh: &Mesh, vertex: u32, candidates: &[u32]) -> f32 {
    angle_intensity(mesh, vertex, candidates, |angle| {
        if angle > WASH_ANGLE_THRESHOLD {
            1.0 / (1.0 + (angle - 90.0).abs() / WASH_ANGLE_THRESHOLD)
        } else {
            0.0
        }
    })
}

/// Raised-edge intensity: near-parallel neighbors (below 70 degrees) contribute.
pub fn edge_intensity(mesh: &Mesh, vertex: u32, candidates: &[u32]) -> f32 {
    angle_intensity(mesh, vertex, candidates, |angle| {
        if angle < DRY_BRUSH_ANGLE_THRESHOLD {
            1.0 - angle / DRY_BRUSH_ANGLE_THRESHOLD
        } else {
            0.0
        }
    })
}

/// Wash opacity for a crease intensity, or `None` if too faint to paint.
pub fn wash_opacity(intensity: f32) -> Option<f32> {
    let opacity = intensity * intensity * WASH_MAX_OPACITY;
    (opacity > WASH_MIN_OPACITY).then_some(opacity)
}

/// Dry brush opacity for an edge intensity, or `None` at the floor.
pub fn dry_brush_opacity(intensity: f32) -> Option<f32> {
    let opacity = (intensity * DRY_BRUSH_OPACITY_SCALE).max(DRY_BRUSH_MIN_OPACITY);
    (opacity > DRY_BRUSH_MIN_OPACITY).then_some(opacity)
}
