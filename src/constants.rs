use std::path::PathBuf;

use dirs::preference_dir;

pub const APP_NAME: &str = "mazerace";

/// Directory holding the settings file, falls back to the working directory
/// on platforms without a preference dir.
pub fn base_path() -> PathBuf {
    preference_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}
