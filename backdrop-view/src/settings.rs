//! Viewer settings, optionally loaded from a JSON file.
//!
//! Every key is optional; anything missing keeps its default. Example:
//!
//! ```json
//! { "field": { "wide_count": 60, "proximity": "grid" }, "layer_opacity": 0.7 }
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use backdrop_core::{ConfigError, FieldConfig, Style};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldConfig,
    pub style: Style,
    /// Opacity of the whole backdrop layer.
    pub layer_opacity: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            style: Style::default(),
            layer_opacity: 0.5,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),

    #[error("layer opacity must lie in [0, 1], got {0}")]
    LayerOpacity(f32),
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        self.field.validate()?;
        if !(0.0..=1.0).contains(&self.layer_opacity) {
            return Err(ConfigLoadError::LayerOpacity(self.layer_opacity));
        }
        Ok(())
    }

    /// Parses and validates settings from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigLoadError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Loads `path` if given, falling back to defaults on any error.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => {
                log::info!("loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::error!("{e}; using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backdrop_core::ProximityKind;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn partial_field_section_keeps_other_defaults() {
        let s = Settings::from_json(
            r#"{ "field": { "wide_count": 60, "proximity": "grid" }, "layer_opacity": 0.7 }"#,
        )
        .unwrap();

        assert_eq!(s.field.wide_count, 60);
        assert_eq!(s.field.proximity, ProximityKind::Grid);
        assert_eq!(s.field.narrow_count, 25);
        assert_eq!(s.field.link_distance, 150.0);
        assert_eq!(s.layer_opacity, 0.7);
        assert_eq!(s.style, Style::default());
    }

    #[test]
    fn invalid_field_config_is_rejected() {
        let err = Settings::from_json(r#"{ "field": { "link_distance": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Invalid(_)));
    }

    #[test]
    fn out_of_range_layer_opacity_is_rejected() {
        let err = Settings::from_json(r#"{ "layer_opacity": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigLoadError::LayerOpacity(v) if v == 2.0));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = Settings::from_json("{ field: ").unwrap_err();
        assert!(matches!(err, ConfigLoadError::Json(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new("/definitely/not/here/backdrop.json");
        assert!(matches!(
            Settings::load(path),
            Err(ConfigLoadError::Io { .. })
        ));
        assert_eq!(Settings::load_or_default(Some(path)), Settings::default());
        assert_eq!(Settings::load_or_default(None), Settings::default());
    }

    #[test]
    fn settings_file_round_trips_through_disk() {
        let path = std::env::temp_dir().join(format!("backdrop-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.field.max_connections = Some(100);
        fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();

        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }
}
