use thiserror::Error;

/// Errors from palette and color-history persistence
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid palette name: {0:?}")]
    InvalidName(String),
    #[error("Palette not found: {0}")]
    NotFound(String),
    #[error("Invalid CSS color: {0:?}")]
    InvalidColor(String),
}
