//! Spatial index over mesh vertices.
//!
//! A bounding volume hierarchy is bulk-loaded once per mesh by recursive
//! median splits along the longest axis. Vertices never move while painting,
//! so the tree is immutable after construction and is rebuilt wholesale when
//! a new mesh is loaded.

use glam::Vec3;
use thiserror::Error;
use tracing::debug;

use crate::constants::BVH_LEAF_SIZE;
use crate::mesh::Mesh;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("Cannot build a spatial index over an empty mesh")]
    EmptyMesh,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Degenerate box containing a single point.
    pub fn from_point(point: Vec3) -> Self {
        Self::new(point, point)
    }

    /// Cube of half-width `half_extent` around `center`.
    pub fn cube(center: Vec3, half_extent: f32) -> Self {
        let half = Vec3::splat(half_extent);
        Self::new(center - half, center + half)
    }

    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(self, other: Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }
}

/// A stored point: vertex index plus its position.
#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    vertex: u32,
    position: Vec3,
}

/// Flattened BVH node. Leaves have `count > 0`.
#[derive(Debug, Clone, Copy)]
struct BvhNode {
    bounds: Aabb,
    left: u32,
    right: u32,
    start: u32,
    count: u32,
}

impl BvhNode {
    fn leaf(bounds: Aabb, start: usize, count: usize) -> Self {
        Self {
            bounds,
            left: u32::MAX,
            right: u32::MAX,
            start: start as u32,
            count: count as u32,
        }
    }

    fn inner(bounds: Aabb, left: u32, right: u32) -> Self {
        Self {
            bounds,
            left,
            right,
            start: 0,
            count: 0,
        }
    }

    fn is_leaf(&self) -> bool {
        self.count != 0
    }
}

/// Bulk-loaded vertex index supporting axis-aligned range queries.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    nodes: Vec<BvhNode>,
    entries: Vec<IndexEntry>,
}

impl SpatialIndex {
    /// Bulk-load an index from `(vertex index, position)` pairs.
    pub fn build(points: impl IntoIterator<Item = (u32, Vec3)>) -> Result<Self, IndexError> {
        let entries: Vec<IndexEntry> = points
            .into_iter()
            .map(|(vertex, position)| IndexEntry { vertex, position })
            .collect();

        if entries.is_empty() {
            return Err(IndexError::EmptyMesh);
        }

        let mut index = Self {
            nodes: Vec::with_capacity(2 * entries.len() / BVH_LEAF_SIZE + 1),
            entries,
        };
        let len = index.entries.len();
        index.build_node(0, len);

        debug!(
            "SpatialIndex::build: {} points, {} nodes",
            index.entries.len(),
            index.nodes.len()
        );
        Ok(index)
    }

    /// Bulk-load an index over every vertex of a mesh.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, IndexError> {
        Self::build(
            mesh.positions()
                .iter()
                .enumerate()
                .map(|(i, p)| (i as u32, *p)),
        )
    }

    fn build_node(&mut self, start: usize, end: usize) -> u32 {
        let node_index = self.nodes.len() as u32;
        let bounds = self.range_bounds(start, end);
        let count = end - start;

        if count <= BVH_LEAF_SIZE {
            self.nodes.push(BvhNode::leaf(bounds, start, count));
            return node_index;
        }

        // Placeholder, patched once both children exist
        self.nodes.push(BvhNode::inner(bounds, 0, 0));

        let axis = longest_axis(bounds.size());
        let mid = start + count / 2;
        self.entries[start..end].select_nth_unstable_by(mid - start, |a, b| {
            a.position[axis].total_cmp(&b.position[axis])
        });

        let left = self.build_node(start, mid);
        let right = self.build_node(mid, end);
        self.nodes[node_index as usize] = BvhNode::inner(bounds, left, right);
        node_index
    }

    fn range_bounds(&self, start: usize, end: usize) -> Aabb {
        let mut bounds = Aabb::empty();
        for entry in &self.entries[start..end] {
            bounds.include_point(entry.position);
        }
        bounds
    }

    /// Collect every vertex whose position lies inside `query`. Unordered.
    pub fn query(&self, query: &Aabb) -> Vec<u32> {
        let mut results = Vec::new();
        self.query_into(query, &mut results);
        results
    }

    /// Like [`SpatialIndex::query`], appending into a reusable buffer.
    pub fn query_into(&self, query: &Aabb, results: &mut Vec<u32>) {
        let mut stack = vec![0u32];

        while let Some(node_index) = stack.pop() {
            let node = self.nodes[node_index as usize];
            if !node.bounds.intersects(query) {
                continue;
            }

            if node.is_leaf() {
                let start = node.start as usize;
                let end = start + node.count as usize;
                results.extend(
                    self.entries[start..end]
                        .iter()
                        .filter(|entry| query.contains_point(entry.position))
                        .map(|entry| entry.vertex),
                );
                continue;
            }

            stack.push(node.left);
            stack.push(node.right);
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a successfully built index.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bounds of every indexed point.
    pub fn bounds(&self) -> Aabb {
        self.nodes[0].bounds
    }
}

fn longest_axis(extent: Vec3) -> usize {
    if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    }
}
