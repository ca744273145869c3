//! Per-vertex color buffer for the loaded mesh.
//!
//! This module provides:
//! - [`ColorStore`] - The mutable color buffer the brush paints into
//! - [`RecentColors`] - Bounded palette of recently used brush colors
//! - [`ColorHistoryRecord`] - The persisted form of the recent-colors palette

mod record;
mod recent;

pub use recent::RecentColors;
pub use record::ColorHistoryRecord;

use tracing::debug;

use crate::mesh::Mesh;
use crate::types::Rgb;

/// Owns the per-vertex colors of the loaded mesh.
///
/// The buffer starts either from the mesh's authored colors or from a
/// uniform default. Authored buffers are never flooded by material color
/// changes.
#[derive(Debug, Clone)]
pub struct ColorStore {
    colors: Vec<Rgb>,
    authored: bool,
    dirty: bool,
    recent: RecentColors,
}

impl ColorStore {
    /// Initialize for `mesh`: authored colors if present, else `default`.
    pub fn initialize(mesh: &Mesh, default: Rgb, recent: RecentColors) -> Self {
        let (colors, authored) = match mesh.authored_colors() {
            Some(colors) => (colors.to_vec(), true),
            None => (vec![default; mesh.len()], false),
        };
        debug!(
            "ColorStore::initialize: {} vertices, authored={}",
            colors.len(),
            authored
        );
        Self {
            colors,
            authored,
            dirty: true,
            recent,
        }
    }

    /// Number of vertex colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Whether the buffer came from authored mesh colors
    pub fn is_authored(&self) -> bool {
        self.authored
    }

    /// Color at `index`, or `None` if out of range
    #[inline]
    pub fn get(&self, index: u32) -> Option<Rgb> {
        self.colors.get(index as usize).copied()
    }

    /// Write `color` at `index`, returning the previous color.
    ///
    /// Out-of-range writes are ignored and return `None`.
    #[inline]
    pub fn set(&mut self, index: u32, color: Rgb) -> Option<Rgb> {
        let slot = self.colors.get_mut(index as usize)?;
        let previous = std::mem::replace(slot, color);
        self.dirty = true;
        Some(previous)
    }

    /// Flood-fill every vertex with `color`
    pub fn apply_bulk_color(&mut self, color: Rgb) {
        self.colors.fill(color);
        self.dirty = true;
    }

    /// Flood-fill for a material color change unless colors are authored.
    ///
    /// Returns true if the buffer was recolored.
    pub fn recolor_for_material(&mut self, color: Rgb) -> bool {
        if self.authored {
            debug!("ColorStore: authored colors present, skipping material recolor");
            return false;
        }
        self.apply_bulk_color(color);
        true
    }

    /// All vertex colors in mesh order
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Raw bytes of the buffer (three `f32` per vertex) for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Return and clear the modified-since-last-upload flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn recent_colors(&self) -> &RecentColors {
        &self.recent
    }

    /// Record a brush color as recently used. Returns true if the palette changed.
    pub fn note_color_used(&mut self, color: Rgb) -> bool {
        self.recent.push(color)
    }

    /// Snapshot the recent-colors palette for the side-file
    pub fn serialize(&self) -> ColorHistoryRecord {
        ColorHistoryRecord::new(self.recent.as_slice().to_vec())
    }

    /// Restore the recent-colors palette from a side-file record
    pub fn restore_history(&mut self, record: &ColorHistoryRecord) {
        self.recent.replace(record.color_history.iter().copied());
    }

    /// Hand the recent-colors palette over to the next model's store
    pub(crate) fn into_recent(self) -> RecentColors {
        self.recent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb8;
    use glam::Vec3;

    fn mesh(n: usize) -> Mesh {
        Mesh::new(vec![Vec3::ZERO; n], vec![Vec3::Z; n]).unwrap()
    }

    #[test]
    fn test_initialize_default() {
        let store = ColorStore::initialize(&mesh(3), Rgb::WHITE, RecentColors::new(4));
        assert_eq!(store.len(), 3);
        assert!(!store.is_authored());
        assert!(store.colors().iter().all(|c| *c == Rgb::WHITE));
    }

    #[test]
    fn test_initialize_authored() {
        let authored = vec![Rgb::new(0.1, 0.2, 0.3), Rgb::new(0.4, 0.5, 0.6)];
        let mesh = mesh(2).with_colors(authored.clone()).unwrap();
        let store = ColorStore::initialize(&mesh, Rgb::WHITE, RecentColors::new(4));
        assert!(store.is_authored());
        assert_eq!(store.colors(), &authored[..]);
    }

    #[test]
    fn test_set_returns_previous() {
        let mut store = ColorStore::initialize(&mesh(2), Rgb::WHITE, RecentColors::new(4));
        store.take_dirty();

        let red = Rgb::new(1.0, 0.0, 0.0);
        assert_eq!(store.set(1, red), Some(Rgb::WHITE));
        assert_eq!(store.get(1), Some(red));
        assert!(store.take_dirty());
        assert!(!store.take_dirty());

        assert_eq!(store.set(5, red), None);
        assert_eq!(store.get(5), None);
    }

    #[test]
    fn test_material_recolor_suppressed_when_authored() {
        let mesh = mesh(2).with_colors(vec![Rgb::BLACK; 2]).unwrap();
        let mut store = ColorStore::initialize(&mesh, Rgb::WHITE, RecentColors::new(4));
        assert!(!store.recolor_for_material(Rgb::WHITE));
        assert_eq!(store.get(0), Some(Rgb::BLACK));

        store.apply_bulk_color(Rgb::WHITE);
        assert_eq!(store.get(0), Some(Rgb::WHITE));
    }

    #[test]
    fn test_material_recolor_floods_default() {
        let mut store = ColorStore::initialize(&mesh(4), Rgb::WHITE, RecentColors::new(4));
        let blue = Rgb::new(0.0, 0.0, 1.0);
        assert!(store.recolor_for_material(blue));
        assert!(store.colors().iter().all(|c| *c == blue));
    }

    #[test]
    fn test_as_bytes_layout() {
        let store = ColorStore::initialize(&mesh(2), Rgb::WHITE, RecentColors::new(4));
        assert_eq!(store.as_bytes().len(), 2 * 3 * std::mem::size_of::<f32>());
    }

    #[test]
    fn test_serialize_and_restore_history() {
        let mut store = ColorStore::initialize(&mesh(1), Rgb::WHITE, RecentColors::new(4));
        store.note_color_used(Rgb::new(1.0, 0.0, 0.0));
        store.note_color_used(Rgb::new(0.0, 0.0, 1.0));

        let record = store.serialize();
        assert_eq!(
            record.color_history,
            vec![Rgb8::new(0, 0, 255), Rgb8::new(255, 0, 0)]
        );

        let mut other = ColorStore::initialize(&mesh(1), Rgb::WHITE, RecentColors::new(4));
        other.restore_history(&record);
        assert_eq!(other.serialize(), record);
    }
}
