//! `datagrid blocks`: template sources and the blocks each defines.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use super::{build_extension, load_config};

/// Arguments for `datagrid blocks`.
#[derive(Args, Debug)]
pub struct BlocksArgs {
    /// Theme file to include in the listing.
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Config file; defaults to the per-user config.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Tabled)]
struct BlockRow {
    #[tabled(rename = "block")]
    block: String,
    #[tabled(rename = "overrides")]
    overrides: String,
}

impl BlocksArgs {
    pub fn run(self) -> Result<()> {
        let config = load_config(self.config.as_deref())?;
        let (ext, _) = build_extension(&config, self.theme.as_ref())?;
        let env = ext.environment();
        let default = env.load(ext.default_template())?;

        for reference in env.store().references() {
            let source = env.load(&reference)?;
            let is_default = source.name() == default.name();
            let rows: Vec<BlockRow> = source
                .block_names()
                .into_iter()
                .map(|block| BlockRow {
                    overrides: if !is_default && default.has_block(&block) {
                        "default".yellow().to_string()
                    } else {
                        String::new()
                    },
                    block,
                })
                .collect();

            let label = if is_default {
                format!("{} (default)", reference)
            } else {
                reference
            };
            println!("{} {} blocks", label.bold(), rows.len());
            if !rows.is_empty() {
                let mut table = Table::new(rows);
                table.with(Style::rounded());
                println!("{table}");
            }
        }
        Ok(())
    }
}
