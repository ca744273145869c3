//! Named palettes, one JSON file per palette in a host-owned directory.
//!
//! ```text
//! { "name": "Skin tones", "colors": ["rgb(233,196,170)", "rgb(180,120,90)"] }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use painting::Rgb8;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::css::{format_css_color, parse_css_color};
use crate::error::PaletteError;

/// A named list of colors, independent of any mesh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteRecord {
    pub name: String,
    /// CSS color strings
    pub colors: Vec<String>,
}

impl PaletteRecord {
    pub fn new(name: impl Into<String>, colors: Vec<String>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Build a palette from 8-bit colors, e.g. the session's recent colors
    pub fn from_colors(name: impl Into<String>, colors: &[Rgb8]) -> Self {
        Self::new(name, colors.iter().copied().map(format_css_color).collect())
    }

    /// Parsed colors in order. Entries that are not valid CSS colors are
    /// skipped with a warning.
    pub fn parsed_colors(&self) -> Vec<Rgb8> {
        self.colors
            .iter()
            .filter_map(|css| match parse_css_color(css) {
                Ok(color) => Some(color),
                Err(err) => {
                    warn!("Palette {:?}: {}", self.name, err);
                    None
                }
            })
            .collect()
    }
}

/// Palette directory
#[derive(Debug, Clone)]
pub struct PaletteStore {
    dir: PathBuf,
}

impl PaletteStore {
    /// Create a store rooted at `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a palette, replacing any palette with the same name
    pub fn save(&self, palette: &PaletteRecord) -> Result<PathBuf, PaletteError> {
        let path = self.path_for(&palette.name)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, serde_json::to_string_pretty(palette)?)?;
        info!("Palette saved as {}", palette.name);
        Ok(path)
    }

    /// All readable palettes, sorted by name.
    ///
    /// A missing directory is an empty list. Files that fail to read or
    /// parse are skipped.
    pub fn list(&self) -> Result<Vec<PaletteRecord>, PaletteError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut palettes: Vec<PaletteRecord> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| match read_palette(&p) {
                Ok(palette) => Some(palette),
                Err(err) => {
                    warn!("Skipping palette {}: {}", p.display(), err);
                    None
                }
            })
            .collect();

        palettes.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("Listed {} palettes in {}", palettes.len(), self.dir.display());
        Ok(palettes)
    }

    /// Load one palette by name
    pub fn load(&self, name: &str) -> Result<PaletteRecord, PaletteError> {
        let path = self.path_for(name)?;
        match read_palette(&path) {
            Err(PaletteError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                Err(PaletteError::NotFound(name.to_string()))
            }
            other => other,
        }
    }

    /// Delete a palette. Returns false if it did not exist.
    pub fn delete(&self, name: &str) -> Result<bool, PaletteError> {
        let path = self.path_for(name)?;
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Palette deleted: {}", name);
                Ok(true)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// `<dir>/<name>.json`, rejecting names that would escape the directory
    fn path_for(&self, name: &str) -> Result<PathBuf, PaletteError> {
        let trimmed = name.trim();
        let invalid = trimmed.is_empty()
            || trimmed != name
            || name.starts_with('.')
            || name.chars().any(|c| matches!(c, '/' | '\\' | ':') || c.is_control());
        if invalid {
            return Err(PaletteError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

fn read_palette(path: &Path) -> Result<PaletteRecord, PaletteError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, PaletteStore) {
        let dir = TempDir::new().unwrap();
        let store = PaletteStore::new(dir.path().join("palettes"));
        (dir, store)
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, store) = setup_store();
        let palette = PaletteRecord::from_colors("Reds", &[Rgb8::new(255, 0, 0), Rgb8::new(128, 0, 0)]);

        let path = store.save(&palette).unwrap();
        assert!(path.ends_with("Reds.json"));
        assert_eq!(store.load("Reds").unwrap(), palette);
        assert_eq!(palette.colors, vec!["rgb(255,0,0)", "rgb(128,0,0)"]);
    }

    #[test]
    fn test_save_overwrites_by_name() {
        let (_dir, store) = setup_store();
        store
            .save(&PaletteRecord::from_colors("Metal", &[Rgb8::new(1, 1, 1)]))
            .unwrap();
        store
            .save(&PaletteRecord::from_colors("Metal", &[Rgb8::new(2, 2, 2)]))
            .unwrap();

        let palettes = store.list().unwrap();
        assert_eq!(palettes.len(), 1);
        assert_eq!(palettes[0].parsed_colors(), vec![Rgb8::new(2, 2, 2)]);
    }

    #[test]
    fn test_list_sorted_and_skips_bad_files() {
        let (_dir, store) = setup_store();
        for name in ["Zombie", "Armor", "Moss"] {
            store
                .save(&PaletteRecord::from_colors(name, &[Rgb8::new(0, 0, 0)]))
                .unwrap();
        }
        std::fs::write(store.dir().join("broken.json"), "{ nope").unwrap();
        std::fs::write(store.dir().join("notes.txt"), "ignored").unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Armor", "Moss", "Zombie"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let (_dir, store) = setup_store();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_load_missing() {
        let (_dir, store) = setup_store();
        assert!(matches!(
            store.load("ghost"),
            Err(PaletteError::NotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = setup_store();
        store
            .save(&PaletteRecord::from_colors("Temp", &[]))
            .unwrap();

        assert!(store.delete("Temp").unwrap());
        assert!(!store.delete("Temp").unwrap());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_names_rejected() {
        let (_dir, store) = setup_store();
        for name in ["", "  ", "../escape", "a/b", "a\\b", ".hidden", " padded"] {
            let palette = PaletteRecord::new(name, Vec::new());
            assert!(
                matches!(store.save(&palette), Err(PaletteError::InvalidName(_))),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn test_parsed_colors_skip_invalid() {
        let palette = PaletteRecord::new(
            "Mixed",
            vec!["#ff0000".into(), "chartreuse".into(), "rgb(0,0,255)".into()],
        );
        assert_eq!(
            palette.parsed_colors(),
            vec![Rgb8::new(255, 0, 0), Rgb8::new(0, 0, 255)]
        );
    }
}
