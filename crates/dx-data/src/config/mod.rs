//! Settings file loading

use std::fs;
use std::path::Path;

use dx_core::settings::AppSettings;
use tracing::{info, warn};

use crate::DataError;

/// Read settings from a JSON file. Missing fields keep their defaults.
pub fn load_settings(path: &Path) -> Result<AppSettings, DataError> {
    let text = fs::read_to_string(path)?;
    let settings: AppSettings = serde_json::from_str(&text)?;
    info!("Loaded settings from {:?}", path);
    Ok(settings)
}

/// Settings from `path` if given, falling back to defaults on any error
pub fn load_settings_or_default(path: Option<&Path>) -> AppSettings {
    match path {
        Some(path) => load_settings(path).unwrap_or_else(|e| {
            warn!("Could not read settings from {:?}: {}, using defaults", path, e);
            AppSettings::default()
        }),
        None => AppSettings::default(),
    }
}
