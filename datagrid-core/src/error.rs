//! Error types for datagrid-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from URL building and configuration loading.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `grid_url` was asked for a section it does not know how to build.
    #[error("unsupported grid url section '{0}'; expected: order, page, limit, reset, export")]
    UnsupportedSection(String),

    /// An `order` URL referenced a column the grid does not have.
    #[error("grid '{grid}' has no column '{column}'")]
    ColumnNotFound { grid: String, column: String },

    /// Underlying I/O failure while reading a config file.
    #[error("config io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load, with the offending file path.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },
}
