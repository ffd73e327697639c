//! YAML configuration and grid description loading.
//!
//! # Config layout
//!
//! ```yaml
//! default_template: "@DataGrid/blocks.html.tera"
//! theme: themes/admin.html.tera        # optional override layer
//! template_dirs: [templates]           # scanned recursively for *.tera
//! pagerfanta:
//!   enable: false
//!   view: default
//!   options:
//!     prev_message: "«"
//!     next_message: "»"
//! globals:
//!   op: eq
//! ```
//!
//! # API pattern
//!
//! `load_at(path)` reads an explicit file; `load_or_default_at(path)` treats a
//! missing file as "use defaults". `default_config_path()` derives the
//! per-user location from `dirs::config_dir()`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::Grid;

/// Reference of the embedded default theme.
pub const DEFAULT_TEMPLATE: &str = "@DataGrid/blocks.html.tera";

/// Pagination widget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerfantaConfig {
    /// When true, `grid_pager` blocks receive a pre-rendered pagination widget.
    pub enable: bool,
    /// Name of the pagination view to use.
    pub view: String,
    /// Options handed to the view on every render.
    pub options: BTreeMap<String, Value>,
}

impl Default for PagerfantaConfig {
    fn default() -> Self {
        PagerfantaConfig {
            enable: false,
            view: "default".to_owned(),
            options: BTreeMap::new(),
        }
    }
}

/// Top-level renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataGridConfig {
    pub default_template: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub template_dirs: Vec<PathBuf>,
    pub pagerfanta: PagerfantaConfig,
    /// Extra globals merged over the built-in defaults.
    pub globals: BTreeMap<String, Value>,
}

impl Default for DataGridConfig {
    fn default() -> Self {
        DataGridConfig {
            default_template: DEFAULT_TEMPLATE.to_owned(),
            theme: None,
            template_dirs: Vec::new(),
            pagerfanta: PagerfantaConfig::default(),
            globals: BTreeMap::new(),
        }
    }
}

impl DataGridConfig {
    /// Resolves relative `template_dirs` against `base` (the config file's directory).
    pub fn resolve_paths(&mut self, base: &Path) {
        for dir in &mut self.template_dirs {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}

fn io_err(path: &Path, source: std::io::Error) -> CoreError {
    CoreError::Io { path: path.to_path_buf(), source }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CoreError> {
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| CoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load a config file. Relative template dirs resolve against the file's directory.
pub fn load_at(path: &Path) -> Result<DataGridConfig, CoreError> {
    if !path.exists() {
        return Err(CoreError::ConfigNotFound { path: path.to_path_buf() });
    }
    let mut config: DataGridConfig = read_yaml(path)?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}

/// Like [`load_at`], but a missing file yields [`DataGridConfig::default`].
pub fn load_or_default_at(path: &Path) -> Result<DataGridConfig, CoreError> {
    match load_at(path) {
        Err(CoreError::ConfigNotFound { .. }) => Ok(DataGridConfig::default()),
        other => other,
    }
}

/// `<config_dir>/datagrid/config.yaml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("datagrid").join("config.yaml"))
}

/// Load a grid description (YAML, or JSON since JSON is valid YAML).
pub fn load_grid_at(path: &Path) -> Result<Grid, CoreError> {
    read_yaml(path)
}
