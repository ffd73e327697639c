//! Datagrid: render grid descriptions through overridable template blocks.
//!
//! # Usage
//!
//! ```text
//! datagrid render <grid> [--theme <file>] [--id <id>] [--config <file>] [--html-only] [--search] [--block <name>]
//! datagrid resolve <grid> --column <id> [--category cell|filter] [--theme <file>] [--id <id>] [--json]
//! datagrid url <grid> <section> [param]
//! datagrid blocks [--theme <file>] [--config <file>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use commands::{blocks::BlocksArgs, render::RenderArgs, resolve::ResolveArgs, url::UrlArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "datagrid",
    version,
    about = "Render data grids with themeable template blocks",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a grid description to HTML.
    Render(RenderArgs),

    /// Show which override block a column resolves to, and why.
    Resolve(ResolveArgs),

    /// Print a grid action URL.
    Url(UrlArgs),

    /// List template sources and the blocks they define.
    Blocks(BlocksArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

/// Log to stderr so rendered HTML on stdout stays clean. `RUST_LOG` overrides
/// the `info` default.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => args.run(),
        Commands::Resolve(args) => args.run(),
        Commands::Url(args) => args.run(),
        Commands::Blocks(args) => args.run(),
    }
}
