//! Export settings
//!
//! Parsed from a TOML file:
//!
//! ```toml
//! [output]
//! format = "glb"
//! embed_texture = true
//!
//! [asset]
//! copyright = "converted by someone"
//! generator = "kompass"
//!
//! [layout]
//! spacing = 2.0
//! columns = 15
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::document::{AssetInfo, OutputFormat, DEFAULT_GENERATOR};
use crate::layout::GridLayout;
use crate::material::ImageMode;

/// Root settings structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExportSettings {
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub asset: AssetSettings,
    #[serde(default)]
    pub layout: GridLayout,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub embed_texture: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetSettings {
    #[serde(default)]
    pub copyright: Option<String>,
    #[serde(default = "default_generator")]
    pub generator: String,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            copyright: None,
            generator: default_generator(),
        }
    }
}

fn default_generator() -> String {
    DEFAULT_GENERATOR.to_string()
}

impl ExportSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse export settings")
    }

    pub fn image_mode(&self) -> ImageMode {
        ImageMode::from_embed(self.output.embed_texture)
    }

    /// Asset metadata with no extras attached yet
    pub fn asset_info(&self) -> AssetInfo {
        AssetInfo {
            copyright: self.asset.copyright.clone(),
            generator: self.asset.generator.clone(),
            extras: serde_json::Map::new(),
        }
    }
}

/// Load and parse a settings file
pub fn load_settings(path: &Path) -> Result<ExportSettings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read export settings: {:?}", path))?;
    let settings = ExportSettings::from_toml_str(&content)
        .with_context(|| format!("Invalid export settings in {:?}", path))?;
    tracing::debug!("loaded export settings from {:?}: {:?}", path, settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_from_empty_file() {
        let settings = ExportSettings::from_toml_str("").unwrap();

        assert_eq!(settings.output.format, OutputFormat::Gltf);
        assert!(!settings.output.embed_texture);
        assert_eq!(settings.image_mode(), ImageMode::External);
        assert_eq!(settings.asset.generator, DEFAULT_GENERATOR);
        assert_eq!(settings.layout, GridLayout::default());
    }

    #[test]
    fn test_full_settings() {
        let settings = ExportSettings::from_toml_str(
            r#"
            [output]
            format = "glb"
            embed_texture = true

            [asset]
            copyright = "converted by someone"
            generator = "kompass"

            [layout]
            columns = 8
            "#,
        )
        .unwrap();

        assert_eq!(settings.output.format, OutputFormat::Glb);
        assert_eq!(settings.image_mode(), ImageMode::Embedded);
        assert_eq!(settings.layout.columns, 8);
        assert_eq!(settings.layout.spacing, 2.0);

        let asset = settings.asset_info();
        assert_eq!(asset.copyright.as_deref(), Some("converted by someone"));
        assert_eq!(asset.generator, "kompass");
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(ExportSettings::from_toml_str("[output]\nformat = \"obj\"\n").is_err());
    }

    #[test]
    fn test_load_settings_reports_path() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("missing.toml");

        let err = load_settings(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.toml"));

        std::fs::write(&path, "[layout]\nspacing = 3.0\n").unwrap();
        assert_eq!(load_settings(&path).unwrap().layout.spacing, 3.0);
    }
}
