//! MiniPainter painting engine - per-vertex painting of 3D meshes
//!
//! This crate provides the vertex-painting core:
//! - [`mesh`] - Immutable vertex set with optional authored colors
//! - [`spatial`] - Bounding volume hierarchy over vertex positions
//! - [`brush`] - Brush engine and the four blend algorithms
//! - [`color_store`] - Per-vertex color buffer and recent-colors palette
//! - [`history`] - Gesture transactions and undo/redo stacks
//! - [`session`] - Pointer gesture state machine tying it all together
//! - [`validation`] - Brush parameter checks at the API boundary

pub mod brush;
pub mod color_store;
pub mod constants;
pub mod history;
pub mod mesh;
pub mod session;
pub mod spatial;
pub mod types;
pub mod validation;

pub use brush::*;
pub use color_store::*;
pub use constants::*;
pub use history::*;
pub use mesh::*;
pub use session::*;
pub use spatial::*;
pub use types::*;
pub use validation::*;

pub use minipainter_config::PainterConfig;
