//! Viewer configuration.
//!
//! Reads anatomyx.toml from the current directory or the path in the
//! ANATOMYX_CONFIG env var. YAML and JSON variants are accepted too.
//! Every field has a default, so a missing or partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AnatomyxError, Result};

pub const CONFIG_ENV_VAR: &str = "ANATOMYX_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "anatomyx.toml";

/// Complete viewer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Initial visualization parameters
    #[serde(default)]
    pub view: ViewConfig,

    /// Auxiliary data files
    #[serde(default)]
    pub data: DataConfig,
}

// ── View ──────────────────────────────────────────────────────────────────────

/// Initial visualization parameters. Palette and scale are kept as names;
/// unknown names fall back to the defaults when parsed by the color crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Palette name (viridis, magma, inferno, plasma, turbo, cividis, warm, cool)
    #[serde(default = "default_palette")]
    pub palette: String,

    /// Scale name (linear, log)
    #[serde(default = "default_scale")]
    pub scale: String,

    /// Minimum expression value that receives a palette color
    #[serde(default)]
    pub threshold: f64,

    /// Anatomogram variant (male, female)
    #[serde(default = "default_sex")]
    pub sex: String,

    /// Base URL holding homo_sapiens.{male,female}.svg
    #[serde(default = "default_svg_base_url")]
    pub svg_base_url: String,

    /// Element id prefix identifying tissue shapes in the graphic
    #[serde(default = "default_tissue_prefix")]
    pub tissue_prefix: String,
}

fn default_palette() -> String { "viridis".to_string() }
fn default_scale() -> String { "linear".to_string() }
fn default_sex() -> String { "male".to_string() }
fn default_svg_base_url() -> String {
    "https://raw.githubusercontent.com/ebi-gene-expression-group/anatomogram/master/src/svg"
        .to_string()
}
fn default_tissue_prefix() -> String { "UBERON".to_string() }

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            scale: default_scale(),
            threshold: 0.0,
            sex: default_sex(),
            svg_base_url: default_svg_base_url(),
            tissue_prefix: default_tissue_prefix(),
        }
    }
}

// ── Data ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Optional JSON map of tissue id → display name
    #[serde(default)]
    pub tissue_names: Option<PathBuf>,
}

// ── Helper Methods ─────────────────────────────────────────────────────────────

impl ViewerConfig {
    /// Load configuration.
    /// Checks ANATOMYX_CONFIG env var first, then the current directory.
    /// Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        if !path.exists() {
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let config = Self::from_path(&path)?;
        info!("Configuration loaded from {:?}", path);
        Ok(config)
    }

    /// Load from a file, picking the parser from its extension (toml by default).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(path),
            Some("json") => Self::from_json(path),
            _ => Self::from_toml(path),
        }
    }

    pub fn from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| AnatomyxError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AnatomyxError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AnatomyxError::Config(format!("{}: {e}", path.display())))
    }

    /// Save to YAML file
    pub fn to_yaml(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| AnatomyxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.view.palette, "viridis");
        assert_eq!(config.view.scale, "linear");
        assert_eq!(config.view.sex, "male");
        assert_eq!(config.view.threshold, 0.0);
        assert_eq!(config.view.tissue_prefix, "UBERON");
        assert!(config.data.tissue_names.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ViewerConfig = toml::from_str(
            r#"
            [view]
            palette = "magma"
            threshold = 0.25
            "#,
        )
        .unwrap();
        assert_eq!(config.view.palette, "magma");
        assert_eq!(config.view.threshold, 0.25);
        assert_eq!(config.view.scale, "linear");
        assert_eq!(config.data, DataConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: ViewerConfig = toml::from_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = ViewerConfig::default();
        config.view.sex = "female".to_string();
        config.data.tissue_names = Some(PathBuf::from("sample_data/uberon_id_map.json"));
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: ViewerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_from_path_reports_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[view\npalette = ").unwrap();

        let err = ViewerConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, AnatomyxError::Config(_)));
    }

    #[test]
    fn test_to_yaml_reloads_through_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anatomyx.yaml");

        let mut config = ViewerConfig::default();
        config.view.palette = "cividis".to_string();
        config.view.threshold = 0.75;
        config.to_yaml(&path).unwrap();

        assert_eq!(ViewerConfig::from_path(&path).unwrap(), config);
    }
}
