//! Color-history side-file stored next to an exported model.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use painting::ColorHistoryRecord;
use tracing::{debug, info, warn};

use crate::error::PaletteError;

/// Model extensions replaced by `.json` to form the side-file name
const MODEL_EXTENSIONS: [&str; 3] = ["stl", "gltf", "glb"];

/// Side-file path for a model: `model.stl` becomes `model.json`.
///
/// Unknown extensions are kept and `.json` is appended (`model.obj.json`) so
/// the side-file can never overwrite the model itself.
pub fn sidecar_path(model_path: &Path) -> PathBuf {
    let known = model_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MODEL_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        });

    if known {
        model_path.with_extension("json")
    } else {
        let mut name = model_path.as_os_str().to_owned();
        name.push(".json");
        PathBuf::from(name)
    }
}

/// Load the color history saved next to `model_path`.
///
/// Never fails: a missing, unreadable or malformed side-file yields an empty
/// record.
pub fn load_color_history(model_path: &Path) -> ColorHistoryRecord {
    let path = sidecar_path(model_path);
    match std::fs::read_to_string(&path) {
        Ok(json) => {
            let record = ColorHistoryRecord::from_json_str(&json);
            info!(
                "Loaded {} history colors from {}",
                record.color_history.len(),
                path.display()
            );
            record
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("No color history at {}", path.display());
            ColorHistoryRecord::default()
        }
        Err(err) => {
            warn!("Failed to read color history {}: {}", path.display(), err);
            ColorHistoryRecord::default()
        }
    }
}

/// Write `record` next to `model_path`, returning the side-file path
pub fn save_color_history(
    model_path: &Path,
    record: &ColorHistoryRecord,
) -> Result<PathBuf, PaletteError> {
    let path = sidecar_path(model_path);
    let json = record.to_json_string()?;
    std::fs::write(&path, json)?;
    info!("Saved color history to {}", path.display());
    Ok(path)
}
