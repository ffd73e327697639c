//! # datagrid-renderer
//!
//! Resolves which template block renders each part of a data grid and
//! renders it with Tera.
//!
//! Cells and filters are looked up by increasingly generic names
//! (`grid_<id>_column_<col>_cell` … `grid_column_type_<type>_cell`) across an
//! ordered list of template sources: the theme override first, then the
//! default theme. See [`candidates`] for the exact order.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use datagrid_core::Grid;
//! use datagrid_renderer::DataGridExtension;
//! use serde_json::Map;
//!
//! fn render(grid: &mut Grid) {
//!     if let Ok(ext) = DataGridExtension::with_defaults() {
//!         let mut pass = ext.pass();
//!         if let Ok(html) = pass.render_grid(grid, None, "", Map::new()) {
//!             println!("{html}");
//!         }
//!     }
//! }
//! ```

pub mod candidates;
pub mod error;
pub mod extension;
pub mod pagination;
pub mod resolver;
pub mod source;
pub mod store;
pub mod view;

pub use candidates::{BlockCategory, Candidates};
pub use error::{BlockSyntaxError, RenderError};
pub use extension::{DataGridExtension, GridRenderer};
pub use pagination::{DefaultView, Pager, PaginationView};
pub use resolver::{BlockResolver, Environment, Theme};
pub use store::{RenderTarget, TemplateStore, TeraStore};
