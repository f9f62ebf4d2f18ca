//! Conversion settings file
//!
//! Settings are YAML; every key is optional and falls back to the
//! ImageScope placeholder values:
//!
//! ```yaml
//! microns_per_pixel: "0.252000"
//! zoom: "0.182937"
//! length_microns: "5015.4"
//! area_microns: "964349.7"
//! ```

use std::fs;
use std::path::Path;

use crate::converters::geojson_to_aperio::{ConversionError, ConversionSettings};

/// Load settings from a YAML file
pub fn load_settings(path: &Path) -> Result<ConversionSettings, ConversionError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConversionError::Config(format!("read error {}: {}", path.display(), e)))?;

    parse_settings(&content)
        .map_err(|e| ConversionError::Config(format!("{}: {}", path.display(), e)))
}

/// Parse settings YAML; an empty document yields the defaults
pub fn parse_settings(content: &str) -> Result<ConversionSettings, String> {
    if content.trim().is_empty() {
        return Ok(ConversionSettings::default());
    }

    serde_yaml::from_str::<ConversionSettings>(content).map_err(|e| format!("yaml parse error: {}", e))
}

/// Load from `path` when given, otherwise use the defaults
pub fn load_or_default(path: Option<&Path>) -> Result<ConversionSettings, ConversionError> {
    match path {
        Some(p) => load_settings(p),
        None => Ok(ConversionSettings::default()),
    }
}
