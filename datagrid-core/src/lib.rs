//! Grid domain types, action URLs, and configuration.
//!
//! Public API surface:
//! - [`types`]: [`Grid`], [`Column`], [`Row`] and the [`ColumnMeta`] facade
//! - [`url`]: grid action URLs (`order`, `page`, `limit`, `reset`, `export`)
//! - [`config`]: YAML config and grid description loading
//! - [`error`]: [`CoreError`]

pub mod config;
pub mod error;
pub mod types;
pub mod url;

pub use config::{DataGridConfig, PagerfantaConfig, DEFAULT_TEMPLATE};
pub use error::CoreError;
pub use types::{Column, ColumnMeta, Grid, GridHash, Row, SortOrder};
pub use url::UrlSection;
