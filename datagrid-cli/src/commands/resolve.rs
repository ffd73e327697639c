//! `datagrid resolve`: explain override block resolution for one column.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use serde_json::Map;
use tabled::{settings::Style, Table, Tabled};

use datagrid_core::CoreError;
use datagrid_renderer::BlockCategory;

use super::{build_extension, load_config, load_grid};

/// Arguments for `datagrid resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Grid description (YAML or JSON).
    pub grid: PathBuf,

    /// Column to resolve.
    #[arg(long)]
    pub column: String,

    /// `cell` or `filter`.
    #[arg(long, default_value = "cell")]
    pub category: BlockCategory,

    /// Theme file or template reference layered over the default theme.
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Instance id for id-scoped overrides; defaults to the grid's id.
    #[arg(long, default_value = "")]
    pub id: String,

    /// Config file; defaults to the per-user config.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ResolutionJson {
    column: String,
    category: String,
    instance_id: String,
    resolved: Option<String>,
    candidates: Vec<CandidateJson>,
}

#[derive(Serialize)]
struct CandidateJson {
    block: String,
    defined: bool,
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "candidate")]
    block: String,
    #[tabled(rename = "defined")]
    defined: String,
}

impl ResolveArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let (ext, theme) = build_extension(&config, self.theme.as_ref())?;
        let grid = load_grid(&self.grid)?;
        let column = grid.column(&self.column).ok_or_else(|| CoreError::ColumnNotFound {
            grid: grid.hash.to_string(),
            column: self.column.clone(),
        })?;

        let mut pass = ext.pass();
        let resolver = pass.resolver();
        resolver.init_grid(&grid, theme, &self.id, Map::new());
        let report = resolver
            .explain(self.category, &grid.hash, column)
            .context("failed to load template sources")?;
        let resolved = resolver.resolve(self.category, &grid.hash, column)?;
        let instance_id = resolver.instance_id(&grid.hash).to_owned();

        if self.json {
            let payload = ResolutionJson {
                column: column.id.clone(),
                category: self.category.to_string(),
                instance_id,
                resolved,
                candidates: report
                    .into_iter()
                    .map(|(block, defined)| CandidateJson { block, defined })
                    .collect(),
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("failed to serialize resolution JSON")?
            );
            return Ok(());
        }

        let rows: Vec<CandidateRow> = report
            .into_iter()
            .enumerate()
            .map(|(i, (block, defined))| CandidateRow {
                rank: i + 1,
                block,
                defined: if defined {
                    "yes".green().to_string()
                } else {
                    "no".bright_black().to_string()
                },
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");

        match resolved {
            Some(block) => println!("{} {}", "resolved:".bold(), block),
            None => println!("{} nothing (no {} block rendered)", "resolved:".bold(), self.category),
        }
        Ok(())
    }
}
