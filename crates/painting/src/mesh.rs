//! Paintable mesh data
//!
//! Positions and normals are fixed at load time. Authored vertex colors are
//! an explicit optional buffer: when present, they seed the color store and
//! suppress material recoloring.

use glam::Vec3;
use thiserror::Error;

use crate::spatial::Aabb;
use crate::types::Rgb;
use crate::validation::{ValidationError, validate_color};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("Normal count {normals} does not match position count {positions}")]
    NormalCountMismatch { positions: usize, normals: usize },
    #[error("Color count {colors} does not match position count {positions}")]
    ColorCountMismatch { positions: usize, colors: usize },
    #[error("Vertex {0} has a non-finite position")]
    NonFinitePosition(usize),
    #[error("Triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("Triangle soup length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
    #[error("Authored color at vertex {index} is out of range: {source}")]
    InvalidColor {
        index: usize,
        source: ValidationError,
    },
}

/// Immutable vertex set with optional authored colors
#[derive(Debug, Clone)]
pub struct Mesh {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    colors: Option<Vec<Rgb>>,
}

impl Mesh {
    /// Create a mesh from matching position and normal buffers
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>) -> Result<Self, MeshError> {
        if positions.len() != normals.len() {
            return Err(MeshError::NormalCountMismatch {
                positions: positions.len(),
                normals: normals.len(),
            });
        }
        if let Some(bad) = positions.iter().position(|p| !p.is_finite()) {
            return Err(MeshError::NonFinitePosition(bad));
        }

        Ok(Self {
            positions,
            normals,
            colors: None,
        })
    }

    /// Attach authored per-vertex colors (e.g. a glTF `COLOR_0` attribute)
    pub fn with_colors(mut self, colors: Vec<Rgb>) -> Result<Self, MeshError> {
        if colors.len() != self.positions.len() {
            return Err(MeshError::ColorCountMismatch {
                positions: self.positions.len(),
                colors: colors.len(),
            });
        }
        for (index, color) in colors.iter().enumerate() {
            validate_color(*color).map_err(|source| MeshError::InvalidColor { index, source })?;
        }
        self.colors = Some(colors);
        Ok(self)
    }

    /// Build an indexed mesh, computing area-weighted vertex normals
    pub fn from_indexed_triangles(
        positions: Vec<Vec3>,
        triangles: &[[u32; 3]],
    ) -> Result<Self, MeshError> {
        let vertex_count = positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for triangle in triangles {
            if let Some(&index) = triangle.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
            let [a, b, c] = triangle.map(|i| i as usize);
            // Cross product magnitude is twice the triangle area
            let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }

        let normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
        Self::new(positions, normals)
    }

    /// Build a mesh from a non-indexed triangle soup (STL layout).
    ///
    /// Vertices are not shared, so every vertex takes its face normal.
    pub fn from_triangle_soup(positions: Vec<Vec3>) -> Result<Self, MeshError> {
        if positions.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(positions.len()));
        }
        let triangles: Vec<[u32; 3]> = (0..positions.len() as u32 / 3)
            .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
            .collect();
        Self::from_indexed_triangles(positions, &triangles)
    }

    /// Translate positions so the bounding box is centered on the origin
    pub fn centered(mut self) -> Self {
        if self.positions.is_empty() {
            return self;
        }
        let center = self.bounds().center();
        for position in &mut self.positions {
            *position -= center;
        }
        self
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    #[inline]
    pub fn position(&self, index: u32) -> Vec3 {
        self.positions[index as usize]
    }

    #[inline]
    pub fn normal(&self, index: u32) -> Vec3 {
        self.normals[index as usize]
    }

    /// Authored vertex colors, if the source model carried any
    pub fn authored_colors(&self) -> Option<&[Rgb]> {
        self.colors.as_deref()
    }

    pub fn has_authored_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Bounding box of all positions
    pub fn bounds(&self) -> Aabb {
        let mut bounds = Aabb::empty();
        for &position in &self.positions {
            bounds.include_point(position);
        }
        bounds
    }
}
