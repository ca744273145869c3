//! Brush engine for vertex painting
//!
//! A brush invocation paints every vertex inside a sphere around the hit
//! point. Candidates come from the spatial index as a cube query, then an
//! exact distance test trims them to the sphere. Each retained vertex gets a
//! new color from the active [`PaintAlgorithm`].

pub mod blend;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::color_store::ColorStore;
use crate::mesh::Mesh;
use crate::spatial::{Aabb, SpatialIndex};
use crate::types::{BrushParams, PaintAlgorithm, VertexColorDiff};
use crate::validation::ValidationError;

/// Applies brush dabs to a color store.
///
/// Holds the random source for the metallic brush and scratch buffers
/// reused across invocations.
pub struct BrushEngine {
    rng: StdRng,
    candidates: Vec<u32>,
    retained: Vec<u32>,
}

impl Default for BrushEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BrushEngine {
    /// Create an engine seeded from system entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an engine with a fixed seed for reproducible metallic strokes
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rng,
            candidates: Vec::new(),
            retained: Vec::new(),
        }
    }

    /// Paint one dab centered at `point` (model-local space).
    ///
    /// Writes new colors into `colors` in place and returns one diff per
    /// vertex whose color changed. When the index is not built yet the call
    /// is a no-op. Diffs are not deduplicated across calls. Index entries
    /// beyond the mesh's vertex count are ignored.
    pub fn apply(
        &mut self,
        mesh: &Mesh,
        index: Option<&SpatialIndex>,
        params: &BrushParams,
        point: Vec3,
        colors: &mut ColorStore,
    ) -> Result<Vec<VertexColorDiff>, ValidationError> {
        params.validate()?;

        let Some(index) = index else {
            debug!("BrushEngine::apply: spatial index not ready, ignoring");
            return Ok(Vec::new());
        };

        self.candidates.clear();
        index.query_into(&Aabb::cube(point, params.radius), &mut self.candidates);

        let radius_sq = params.radius * params.radius;
        self.retained.clear();
        self.retained.extend(
            self.candidates
                .iter()
                .copied()
                .filter(|&i| (i as usize) < mesh.len())
                .filter(|&i| mesh.position(i).distance_squared(point) <= radius_sq),
        );
        // Neighbor sampling walks this list, keep it independent of tree layout
        self.retained.sort_unstable();

        let mut diffs = Vec::with_capacity(self.retained.len());
        for &vertex in &self.retained {
            let Some(previous) = colors.get(vertex) else {
                continue;
            };

            let new = match params.algorithm {
                PaintAlgorithm::Basic => blend::basic(previous, params.color, params.opacity),
                PaintAlgorithm::Metallic => blend::metallic(params.color, self.rng.r#gen::<f32>()),
                PaintAlgorithm::Wash => {
                    let intensity = blend::crease_intensity(mesh, vertex, &self.retained);
                    match blend::wash_opacity(intensity) {
                        Some(opacity) => blend::basic(previous, params.color, opacity),
                        None => continue,
                    }
                }
                PaintAlgorithm::DryBrush => {
                    let intensity = blend::edge_intensity(mesh, vertex, &self.retained);
                    match blend::dry_brush_opacity(intensity) {
                        Some(opacity) => blend::basic(previous, params.color, opacity),
                        None => continue,
                    }
                }
            };

            if new == previous {
                continue;
            }
            colors.set(vertex, new);
            diffs.push(VertexColorDiff {
                index: vertex,
                previous,
                new,
            });
        }

        debug!(
            "BrushEngine::apply: {:?} at ({:.2}, {:.2}, {:.2}) r={:.2}: {} candidates, {} in sphere, {} changed",
            params.algorithm,
            point.x,
            point.y,
            point.z,
            params.radius,
            self.candidates.len(),
            self.retained.len(),
            diffs.len()
        );

        Ok(diffs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color_store::RecentColors;
    use crate::types::Rgb;

    const RED: Rgb = Rgb::new(1.0, 0.0, 0.0);

    fn four_point_mesh() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(5.0, 5.0, 5.0),
            ],
            vec![Vec3::Z; 4],
        )
        .unwrap()
    }

    fn store_for(mesh: &Mesh) -> ColorStore {
        ColorStore::initialize(mesh, Rgb::WHITE, RecentColors::new(4))
    }

    fn params(algorithm: PaintAlgorithm, radius: f32, opacity: f32) -> BrushParams {
        BrushParams::new(RED, radius, opacity, algorithm).unwrap()
    }

    #[test]
    fn test_basic_scenario() {
        let mesh = four_point_mesh();
        let index = SpatialIndex::from_mesh(&mesh).unwrap();
        let mut colors = store_for(&mesh);
        let mut engine = BrushEngine::with_seed(1);

        let diffs = engine
            .apply(
                &mesh,
                Some(&index),
                &params(PaintAlgorithm::Basic, 1.5, 1.0),
                Vec3::ZERO,
                &mut colors,
            )
            .unwrap();

        assert_eq!(diffs.len(), 3);
        for i in 0..3 {
            assert_eq!(colors.get(i), Some(RED));
        }
        assert_eq!(colors.get(3), Some(Rgb::WHITE));
        assert!(diffs.iter().all(|d| d.previous == Rgb::WHITE && d.new == RED));
    }

    #[test]
    fn test_index_larger_than_mesh_is_ignored() {
        let mesh = four_point_mesh();
        let wider = SpatialIndex::build([
            (0, Vec3::ZERO),
            (1, Vec3::new(1.0, 0.0, 0.0)),
            (9, Vec3::new(0.5, 0.0, 0.0)),
        ])
        .unwrap();
        let mut colors = store_for(&mesh);
        let mut engine = BrushEngine::with_seed(1);

        let diffs = engine
            .apply(
                &mesh,
                Some(&wider),
                &params(PaintAlgorithm::Basic, 1.5, 1.0),
                Vec3::ZERO,
                &mut colors,
            )
            .unwrap();

        let mut painted: Vec<u32> = diffs.iter().map(|d| d.index).collect();
        painted.sort_unstable();
        assert_eq!(painted, vec![0, 1]);
    }

    #[test]
    fn test_sphere_filter_excludes_cube_corners() {
        // (1.4, 1.4, 0) is inside the query cube but outside the sphere
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::new(1.4, 1.4, 0.0), Vec3::new(1.5, 0.0, 0.0)],
            vec![Vec3::Z; 3],
        )
        .unwrap();
        let index = SpatialIndex::from_mesh(&mesh).unwrap();
        let mut colors = store_for(&mesh);

        BrushEngine::with_seed(1)
            .apply(
                &mesh,
                Some(&index),
                &params(PaintAlgorithm::Basic, 1.5, 1.0),
                Vec3::ZERO,
                &mut colors,
            )
            .unwrap();

        assert_eq!(colors.get(0), Some(RED));
        assert_eq!(colors.get(1), Some(Rgb::WHITE));
        // Exactly on the radius is included
        assert_eq!(colors.get(2), Some(RED));
    }

    #[test]
    fn test_basic_partial_opacity_exact() {
        let mesh = four_point_mesh();
        let index = SpatialIndex::from_mesh(&mesh).unwrap();
        let mut colors = store_for(&mesh);
        let previous = Rgb::new(0.3, 0.6, 0.9);
        colors.set(1, previous);

        let opacity = 0.37;
        BrushEngine::with_seed(1)
            .apply(
                &mesh,
                Some(&index),
                &params(PaintAlgorithm::Basic, 1.5, opacity),
                Vec3::ZERO,
                &mut colors,
            )
            .unwrap();

        let result = colors.get(1).unwrap();
        assert_eq!(result.r, previous.r * (1.0 - opacity) + RED.r * opacity);
        assert_eq!(result.g, previous.g * (1.0 - opacity) + RED.g * opacity);
        assert_eq!(result.b, previous.b * (1.0 - opacity) + RED.b * opacity);
    }

    #[test]
    fn test_index_not_ready_is_noop() {
        let mesh = four_point_mesh();
        let mut colors = store_for(&mesh);
        let diffs = BrushEngine::with_seed(1)
            .apply(
                &mesh,
                None,
                &params(PaintAlgorithm::Basic, 1.5, 1.0),
                Vec3::ZERO,
                &mut colors,
            )
            .unwrap();
        assert!(diffs.is_empty());
        assert!(colors.colors().iter().all(|c| *c == Rgb::WHITE));
    }

    #[test]
    fn test_invalid_radius_rejected() {
        let mesh = four_point_mesh();
        let index = SpatialIndex::from_mesh(&mesh).unwrap();
        let mut colors = store_for(&mesh);
        let bad = BrushParams {
            color: RED,
            radius: 0.0,
            opacity: 1.0,
            algorithm: PaintAlgorithm::Basic,
        };

        let result =
            BrushEngine::with_seed(1).apply(&mesh, Some(&index), &bad, Vec3::ZERO, &mut colors);
        assert_eq!(result.unwrap_err(), ValidationError::InvalidRadius(0.0));
        assert!(colors.colors().iter().all(|c| *c == Rgb::WHITE));
    }

    #[test]
    fn test_metallic_jitter_bounds() {
        let n = 200;
        let positions: Vec<Vec3> = (0..n).map(|i| Vec3::new(i as f32 * 0.001, 0.0, 0.0)).collect();
        let mesh = Mesh::new(positions, vec![Vec3::Z; n]).unwrap();
        let index = SpatialIndex::from_mesh(&mesh).unwrap();
        let mut colors = store_for(&mesh);
        let brush = Rgb::new(0.5, 0.5, 0.5);
        let params = BrushParams::new(brush, 1.0, 1.0, PaintAlgorithm::Metallic).unwrap();

        BrushEngine::with_seed(42)
            .apply(&mesh, Some(&index), &params, Vec3::ZERO, &mut colors)
            .unwrap();

        let mut darker = 0;
        let mut brighter = 0;
        for color in colors.colors() {
            assert!(color.r >= 0.5 * 0.85 - 1e-5);
            assert!(color.r <= (0.5 + 0.5 * 0.075) * 1.15 + 1e-5);
            if color.r < 0.5 {
                darker += 1;
            } else if color.r > 0.5 {
                brighter += 1;
            }
        }
        assert!(darker > 0 && brighter > 0);
    }

    #[test]
    fn test_metallic_seed_is_reproducible() {
        let mesh = four_point_mesh();
        let index = SpatialIndex::from_mesh(&mesh).unwrap();
        let params = params(PaintAlgorithm::Metallic, 1.5, 1.0);

        let mut first = store_for(&mesh);
        let mut second = store_for(&mesh);
        BrushEngine::with_seed(9)
            .apply(&mesh, Some(&index), &params, Vec3::ZERO, &mut first)
            .unwrap();
        BrushEngine::with_seed(9)
            .apply(&mesh, Some(&index), &params, Vec3::ZERO, &mut second)
            .unwrap();
        assert_eq!(first.colors(), second.colors());
    }

    /// A flat patch (all +Z) next to a wall (all +X), meeting at a crease.
    fn crease_mesh() -> Mesh {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        for i in 0..8 {
            positions.push(Vec3::new(0.1 * i as f32, 0.0, 0.0));
            normals.push(Vec3::Z);
        }
        for i in 0..8 {
            positions.push(Vec3::new(0.0, 0.1 * i as f32, 0.05));
            normals.push(Vec3::X);
        }
        Mesh::new(positions, normals).unwrap()
    }

    #[test]
    fn test_wash_paints_creases_only() {
        let mesh = crease_mesh();
        let index = SpatialIndex::from_mesh(&mesh).unwrap();

        // Inside the crease: half the sampled neighbors are perpendicular
        let mut colors = store_for(&mesh);
        let diffs = BrushEngine::with_seed(1)
            .apply(
                &mesh,
                Some(&index),
                &params(PaintAlgorithm::Wash, 5.0, 1.0),
                Vec3::ZERO,
                &mut colors,
            )
            .unwrap();
        assert!(!diffs.is_empty());
        for diff in &diffs {
            // Wash never reaches full brush color
            assert!(diff.new.g > 0.0 && diff.new.g < 1.0);
        }

        // A perfectly flat region has no crease and stays untouched
        let flat = Mesh::new(
            (0..8).map(|i| Vec3::new(0.1 * i as f32, 0.0, 0.0)).collect(),
            vec![Vec3::Z; 8],
        )
        .unwrap();
        let flat_index = SpatialIndex::from_mesh(&flat).unwrap();
        let mut flat_colors = store_for(&flat);
        let diffs = BrushEngine::with_seed(1)
            .apply(
                &flat,
                Some(&flat_index),
                &params(PaintAlgorithm::Wash, 5.0, 1.0),
                Vec3::ZERO,
                &mut flat_colors,
            )
            .unwrap();
        assert!(diffs.is_empty());
    }

    #[test]
    fn test_dry_brush_paints_flat_and_skips_crease() {
        let flat = Mesh::new(
            (0..8).map(|i| Vec3::new(0.1 * i as f32, 0.0, 0.0)).collect(),
            vec![Vec3::Z; 8],
        )
        .unwrap();
        let index = SpatialIndex::from_mesh(&flat).unwrap();
        let mut colors = store_for(&flat);
        let diffs = BrushEngine::with_seed(1)
            .apply(
                &flat,
                Some(&index),
                &params(PaintAlgorithm::DryBrush, 5.0, 1.0),
                Vec3::ZERO,
                &mut colors,
            )
            .unwrap();
        assert_eq!(diffs.len(), 8);
        let expected = Rgb::WHITE.lerp(RED, 0.35);
        for diff in &diffs {
            assert!((diff.new.g - expected.g).abs() < 1e-6);
        }

        // In the crease only half the neighbors are parallel: intensity 0.5,
        // which stays at the opacity floor and paints nothing
        let mesh = crease_mesh();
        let index = SpatialIndex::from_mesh(&mesh).unwrap();
        let mut colors = store_for(&mesh);
        let diffs = BrushEngine::with_seed(1)
            .apply(
                &mesh,
                Some(&index),
                &params(PaintAlgorithm::DryBrush, 5.0, 1.0),
                Vec3::ZERO,
                &mut colors,
            )
            .unwrap();
        assert!(diffs.is_empty());
    }
}
