//! Error types for datagrid-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from template loading and block rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No source in the active list defines the block, and no fallback applies.
    #[error("block \"{block}\" doesn't exist in grid template \"{theme}\"")]
    UnknownBlock { block: String, theme: String },

    /// The store has no template source under this reference.
    #[error("template source not found: {reference}")]
    TemplateNotFound { reference: String },

    /// A source's block tags do not nest properly.
    #[error("malformed blocks in {source_name}: {error}")]
    Blocks {
        source_name: String,
        #[source]
        error: BlockSyntaxError,
    },

    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// JSON serialization error (building block parameters).
    #[error("context serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL building or config error from datagrid-core.
    #[error(transparent)]
    Core(#[from] datagrid_core::CoreError),

    /// The configured pagination view name is not registered.
    #[error("unknown pagination view '{0}'")]
    UnknownPagerView(String),

    /// Filesystem error while loading template sources.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

/// Structural problems found while splitting a source into blocks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockSyntaxError {
    #[error("block tag without a name at byte {0}")]
    MissingName(usize),

    #[error("block '{0}' is never closed")]
    Unclosed(String),

    #[error("endblock at byte {0} has no open block")]
    UnexpectedEnd(usize),

    #[error("endblock '{found}' closes block '{open}'")]
    Mismatched { open: String, found: String },

    #[error("block '{0}' is defined twice")]
    Duplicate(String),
}
