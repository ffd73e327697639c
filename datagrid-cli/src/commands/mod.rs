pub mod blocks;
pub mod render;
pub mod resolve;
pub mod url;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use datagrid_core::{config, DataGridConfig, Grid};
use datagrid_renderer::{DataGridExtension, TeraStore, Theme};

/// `--config` when given (must exist), else the per-user config when present,
/// else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<DataGridConfig> {
    if let Some(path) = explicit {
        return config::load_at(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    match config::default_config_path() {
        Some(path) => {
            tracing::debug!(path = %path.display(), "looking for user config");
            config::load_or_default_at(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(DataGridConfig::default()),
    }
}

pub fn load_grid(path: &Path) -> Result<Grid> {
    config::load_grid_at(path).with_context(|| format!("failed to load grid {}", path.display()))
}

/// Extension over the embedded theme, the config's template dirs, and the
/// theme (the `--theme` flag, else the config's `theme`).
///
/// A theme naming an existing file is registered under that path; anything
/// else must be a reference found in the template dirs.
pub fn build_extension(
    config: &DataGridConfig,
    theme: Option<&PathBuf>,
) -> Result<(DataGridExtension, Option<Theme>)> {
    let mut builder = TeraStore::builder().with_embedded_defaults();
    for dir in &config.template_dirs {
        builder = builder
            .add_dir(dir)
            .with_context(|| format!("failed to read template dir {}", dir.display()))?;
    }

    let theme = theme
        .cloned()
        .or_else(|| config.theme.as_ref().map(PathBuf::from));
    if let Some(path) = theme.as_ref().filter(|p| p.is_file()) {
        builder = builder
            .add_file(path)
            .with_context(|| format!("failed to read theme {}", path.display()))?;
    }

    let store = builder.build().context("failed to compile templates")?;
    let ext = DataGridExtension::from_store(store, config)?;
    Ok((ext, theme.map(|p| Theme::from(p.to_string_lossy().into_owned()))))
}
