//! Viewer options with TOML preset support.
//!
//! Service location, post-load processing, camera projection and idle
//! animation settings are consolidated here. Options serialize to/from TOML
//! so a preset can be passed to the binary with `--options`.

mod camera;
mod display;
mod network;
mod scene;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use network::NetworkOptions;
pub use scene::SceneOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[network]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
#[serde(default)]
pub struct Options {
    /// Model service endpoints.
    #[schemars(skip)]
    pub network: NetworkOptions,
    /// Smoothing, fit and highlight parameters.
    pub scene: SceneOptions,
    /// Camera projection parameters.
    pub camera: CameraOptions,
    /// Idle animation toggles.
    pub display: DisplayOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`ViewerError::Io`] if the file cannot be read,
    /// [`ViewerError::OptionsParse`] if it is not valid options TOML or a
    /// value is out of range.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        let options: Self =
            toml::from_str(&content).map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        options.scene.validate().map_err(ViewerError::OptionsParse)?;
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`ViewerError::OptionsParse`] if serialization fails,
    /// [`ViewerError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[network]
base_url = "http://chem.example:9000"

[scene]
fit_max_extent = 4.0
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.network.base_url, "http://chem.example:9000");
        assert_eq!(opts.network.molecule_param, "chemistry_formule");
        assert_eq!(opts.scene.fit_max_extent, 4.0);
        assert_eq!(opts.scene.normal_precision, 3);
        assert!(opts.display.auto_rotate);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets").join("bright.toml");
        let mut opts = Options::default();
        opts.scene.highlight_emissive = [0.5, 0.4, 0.0];
        opts.display.auto_rotate = false;
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[scene\nnormal_precision = ").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(ViewerError::OptionsParse(_))
        ));
        assert!(matches!(
            Options::load(&dir.path().join("missing.toml")),
            Err(ViewerError::Io(_))
        ));
    }

    #[test]
    fn out_of_range_precision_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("precise.toml");
        std::fs::write(&path, "[scene]\nnormal_precision = 40\n").unwrap();
        let err = Options::load(&path).unwrap_err();
        assert!(matches!(&err, ViewerError::OptionsParse(m) if m.contains("normal_precision")));

        std::fs::write(&path, "[scene]\nnormal_precision = 0\n").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(ViewerError::OptionsParse(_))
        ));

        std::fs::write(&path, "[scene]\nnormal_precision = 6\n").unwrap();
        assert_eq!(Options::load(&path).unwrap().scene.normal_precision, 6);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value = serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("scene"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("display"));
        assert!(!props.contains_key("network"));

        let scene = &props["scene"]["properties"];
        assert!(scene.get("normal_precision").is_some());
        assert!(scene.get("highlight_emissive").is_none());
    }
}
