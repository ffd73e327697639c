//! `datagrid url`: print one grid action URL.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use datagrid_core::url::grid_url;

use super::load_grid;

/// Arguments for `datagrid url`.
#[derive(Args, Debug)]
pub struct UrlArgs {
    /// Grid description (YAML or JSON).
    pub grid: PathBuf,

    /// One of: order, page, limit, reset, export.
    pub section: String,

    /// Column id for `order`; page or export id for `page` and `export`.
    pub param: Option<String>,
}

impl UrlArgs {
    pub fn run(self) -> Result<()> {
        let grid = load_grid(&self.grid)?;
        println!("{}", grid_url(&self.section, &grid, self.param.as_deref())?);
        Ok(())
    }
}
