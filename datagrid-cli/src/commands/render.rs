//! `datagrid render`: grid description to HTML on stdout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Map;

use super::{build_extension, load_config, load_grid};

/// Arguments for `datagrid render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Grid description (YAML or JSON).
    pub grid: PathBuf,

    /// Theme file or template reference layered over the default theme.
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Instance id for id-scoped overrides; defaults to the grid's id.
    #[arg(long, default_value = "")]
    pub id: String,

    /// Config file; defaults to the per-user config.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Leave out the JS block.
    #[arg(long, conflicts_with_all = ["search", "block"])]
    pub html_only: bool,

    /// Render the search form instead of the grid.
    #[arg(long, conflicts_with = "block")]
    pub search: bool,

    /// Render `grid_<NAME>` instead of the grid.
    #[arg(long, value_name = "NAME")]
    pub block: Option<String>,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let (ext, theme) = build_extension(&config, self.theme.as_ref())?;
        let mut grid = load_grid(&self.grid)?;
        let mut pass = ext.pass();

        let rendered = if self.search {
            pass.render_search(&grid, theme, &self.id, Map::new())
        } else if let Some(name) = self.block.as_deref() {
            pass.resolver().init_grid(&grid, theme, &self.id, Map::new());
            pass.render_grid_block(name, &grid)
        } else if self.html_only {
            pass.render_grid_html(&mut grid, theme, &self.id, Map::new())
        } else {
            pass.render_grid(&mut grid, theme, &self.id, Map::new())
        };
        let html = rendered.with_context(|| format!("failed to render {}", self.grid.display()))?;

        println!("{}", html.trim());
        Ok(())
    }
}
