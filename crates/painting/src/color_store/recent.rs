//! Bounded most-recent-first palette of brush colors.

use crate::types::{Rgb, Rgb8};

/// Recently used brush colors, most recent first.
///
/// Colors are compared at 8-bit precision, so two brush colors that render
/// the same CSS string occupy a single slot.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentColors {
    colors: Vec<Rgb8>,
    capacity: usize,
}

impl RecentColors {
    /// Create an empty palette holding at most `capacity` colors.
    pub fn new(capacity: usize) -> Self {
        Self {
            colors: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Move `color` to the front, evicting the oldest entry when full.
    ///
    /// Returns true if the palette changed.
    pub fn push(&mut self, color: Rgb) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let color = color.to_rgb8();
        if self.colors.first() == Some(&color) {
            return false;
        }
        self.colors.retain(|c| *c != color);
        self.colors.insert(0, color);
        self.colors.truncate(self.capacity);
        true
    }

    /// Replace the contents, keeping order and dropping duplicates and overflow.
    pub fn replace(&mut self, colors: impl IntoIterator<Item = Rgb8>) {
        self.colors.clear();
        for color in colors {
            if self.colors.len() == self.capacity {
                break;
            }
            if !self.colors.contains(&color) {
                self.colors.push(color);
            }
        }
    }

    pub fn as_slice(&self) -> &[Rgb8] {
        &self.colors
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// CSS `rgb(r,g,b)` strings, most recent first.
    pub fn to_css(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_css()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_moves_to_front() {
        let mut recent = RecentColors::new(3);
        assert!(recent.push(Rgb::new(1.0, 0.0, 0.0)));
        assert!(recent.push(Rgb::new(0.0, 1.0, 0.0)));
        assert!(recent.push(Rgb::new(1.0, 0.0, 0.0)));

        assert_eq!(
            recent.as_slice(),
            &[Rgb8::new(255, 0, 0), Rgb8::new(0, 255, 0)]
        );
    }

    #[test]
    fn test_push_same_front_is_noop() {
        let mut recent = RecentColors::new(3);
        recent.push(Rgb::WHITE);
        assert!(!recent.push(Rgb::WHITE));
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut recent = RecentColors::new(2);
        recent.push(Rgb::new(1.0, 0.0, 0.0));
        recent.push(Rgb::new(0.0, 1.0, 0.0));
        recent.push(Rgb::new(0.0, 0.0, 1.0));

        assert_eq!(
            recent.as_slice(),
            &[Rgb8::new(0, 0, 255), Rgb8::new(0, 255, 0)]
        );
    }

    #[test]
    fn test_replace_dedups_and_truncates() {
        let mut recent = RecentColors::new(2);
        recent.replace([
            Rgb8::new(1, 2, 3),
            Rgb8::new(1, 2, 3),
            Rgb8::new(4, 5, 6),
            Rgb8::new(7, 8, 9),
        ]);
        assert_eq!(recent.as_slice(), &[Rgb8::new(1, 2, 3), Rgb8::new(4, 5, 6)]);
        assert_eq!(recent.to_css(), vec!["rgb(1,2,3)", "rgb(4,5,6)"]);
    }
}
