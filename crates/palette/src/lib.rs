//! MiniPainter palette persistence
//!
//! This crate provides:
//! - [`history_file`] - The color-history side-file next to an exported model
//! - [`palette`] - Named palettes stored one file each in a directory
//! - [`css`] - CSS color strings used by palette records

pub mod css;
pub mod error;
pub mod history_file;
pub mod palette;

pub use css::{format_css_color, parse_css_color};
pub use error::PaletteError;
pub use history_file::{load_color_history, save_color_history, sidecar_path};
pub use palette::{PaletteRecord, PaletteStore};
