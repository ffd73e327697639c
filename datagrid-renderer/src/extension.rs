//! Grid rendering entry points.
//!
//! [`DataGridExtension`] is built once and shared; it owns the environment,
//! the default template reference, and pagination settings. Each render pass
//! opens a [`GridRenderer`] with [`DataGridExtension::pass`], which owns that
//! pass's [`BlockResolver`] and exposes one method per template-facing entry
//! point:
//!
//! | method                    | block                                  |
//! |---------------------------|----------------------------------------|
//! | `render_grid`             | `grid` (with JS)                       |
//! | `render_grid_html`        | `grid` (without JS)                    |
//! | `render_grid_block`       | `grid_<name>`                          |
//! | `render_pager`            | `grid_pager`                           |
//! | `render_cell`             | resolved cell override                 |
//! | `render_filter`           | resolved filter override, or nothing   |
//! | `render_column_operator`  | `grid_column_operator`                 |
//! | `render_search`           | `grid_search`                          |
//! | `render_pagerfanta`       | pagination view, no block              |
//! | `grid_url`                | URL, no block                          |

use std::sync::Arc;

use serde_json::{Map, Value};

use datagrid_core::{url, Column, DataGridConfig, Grid, PagerfantaConfig, Row, DEFAULT_TEMPLATE};

use crate::candidates::{BlockCategory, CELL_FALLBACK, COLUMN_OPERATOR};
use crate::error::RenderError;
use crate::pagination::{view_by_name, DefaultView, PaginationView};
use crate::resolver::{BlockResolver, Environment, Theme};
use crate::store::TeraStore;
use crate::view::{pager_for, params, to_param, CellView, ColumnView, GridView, RowView};

// ---------------------------------------------------------------------------
// DataGridExtension
// ---------------------------------------------------------------------------

pub struct DataGridExtension {
    env: Environment,
    default_template: String,
    pager: PagerfantaConfig,
    view: Box<dyn PaginationView>,
}

impl DataGridExtension {
    /// Extension over `env` with pagination disabled and the default view.
    pub fn new(env: Environment, default_template: impl Into<String>) -> Self {
        DataGridExtension {
            env,
            default_template: default_template.into(),
            pager: PagerfantaConfig::default(),
            view: Box::new(DefaultView),
        }
    }

    /// Embedded default theme only.
    pub fn with_defaults() -> Result<Self, RenderError> {
        let store = TeraStore::with_defaults()?;
        Ok(Self::new(Environment::new(Arc::new(store)), DEFAULT_TEMPLATE))
    }

    /// Embedded default theme plus every template dir in `config`, config
    /// globals, and the configured pagination view.
    pub fn from_config(config: &DataGridConfig) -> Result<Self, RenderError> {
        let mut builder = TeraStore::builder().with_embedded_defaults();
        for dir in &config.template_dirs {
            builder = builder.add_dir(dir)?;
        }
        Self::from_store(builder.build()?, config)
    }

    /// Like [`DataGridExtension::from_config`] with a caller-assembled store.
    pub fn from_store(store: TeraStore, config: &DataGridConfig) -> Result<Self, RenderError> {
        let env = Environment::new(Arc::new(store)).with_globals(config.globals.clone());
        let view = view_by_name(&config.pagerfanta.view)?;
        Ok(Self::new(env, config.default_template.clone()).with_pager(config.pagerfanta.clone(), view))
    }

    pub fn with_pager(mut self, pager: PagerfantaConfig, view: Box<dyn PaginationView>) -> Self {
        self.pager = pager;
        self.view = view;
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn default_template(&self) -> &str {
        &self.default_template
    }

    /// Open a render pass.
    pub fn pass(&self) -> GridRenderer<'_> {
        GridRenderer {
            ext: self,
            resolver: BlockResolver::new(&self.env, self.default_template.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// GridRenderer
// ---------------------------------------------------------------------------

/// One render pass. Grids are registered by `render_grid`, `render_grid_html`
/// and `render_search`; the other entry points use whatever registration the
/// grid already has.
pub struct GridRenderer<'a> {
    ext: &'a DataGridExtension,
    resolver: BlockResolver<'a>,
}

impl<'a> GridRenderer<'a> {
    pub fn resolver(&mut self) -> &mut BlockResolver<'a> {
        &mut self.resolver
    }

    /// Full grid, including the JS block.
    pub fn render_grid(
        &mut self,
        grid: &mut Grid,
        theme: Option<Theme>,
        id: &str,
        params: Map<String, Value>,
    ) -> Result<String, RenderError> {
        self.grid_with_js(grid, theme, id, params, true)
    }

    /// Full grid without the JS block.
    pub fn render_grid_html(
        &mut self,
        grid: &mut Grid,
        theme: Option<Theme>,
        id: &str,
        params: Map<String, Value>,
    ) -> Result<String, RenderError> {
        self.grid_with_js(grid, theme, id, params, false)
    }

    fn grid_with_js(
        &mut self,
        grid: &mut Grid,
        theme: Option<Theme>,
        id: &str,
        grid_params: Map<String, Value>,
        withjs: bool,
    ) -> Result<String, RenderError> {
        // Exports re-render with the same theme.
        grid.template = theme.as_ref().map(|t| t.name().to_owned());
        self.resolver.init_grid(grid, theme, id, grid_params);
        tracing::debug!(grid = %grid.hash, withjs, "rendering grid");

        let view = self.full_view(grid)?;
        let p = params([("grid", to_param(&view)?), ("withjs", Value::Bool(withjs))]);
        self.resolver.render_block("grid", p, &grid.hash)
    }

    /// `grid_<name>` with the full grid view.
    pub fn render_grid_block(&mut self, name: &str, grid: &Grid) -> Result<String, RenderError> {
        let view = self.full_view(grid)?;
        let p = params([("grid", to_param(&view)?)]);
        self.resolver.render_block(&format!("grid_{name}"), p, &grid.hash)
    }

    pub fn render_pager(&mut self, grid: &Grid) -> Result<String, RenderError> {
        let enabled = self.ext.pager.enable;
        let widget = if enabled {
            self.render_pagerfanta(grid)
        } else {
            String::new()
        };
        let p = params([
            ("grid", to_param(&self.shallow_view(grid))?),
            ("pagerfanta", Value::Bool(enabled)),
            ("pagerfanta_html", Value::String(widget)),
        ]);
        self.resolver.render_block("grid_pager", p, &grid.hash)
    }

    /// Most specific cell override defined for `column`, else `grid_column_cell`.
    pub fn render_cell(&mut self, column: &Column, row: &Row, grid: &Grid) -> Result<String, RenderError> {
        let shallow = to_param(&self.shallow_view(grid))?;
        self.cell_with(column, row, grid, &shallow)
    }

    /// Most specific filter override defined for `column`; empty when none is.
    pub fn render_filter(
        &mut self,
        column: &Column,
        grid: &Grid,
        submit_on_change: bool,
    ) -> Result<String, RenderError> {
        let shallow = to_param(&self.shallow_view(grid))?;
        self.filter_with(column, grid, &shallow, submit_on_change)
    }

    pub fn render_column_operator(
        &mut self,
        column: &Column,
        grid: &Grid,
        operator: &str,
        submit_on_change: bool,
    ) -> Result<String, RenderError> {
        let p = params([
            ("grid", to_param(&self.shallow_view(grid))?),
            ("column", to_param(&ColumnView::new(grid, column))?),
            ("submitOnChange", Value::Bool(submit_on_change)),
            ("op", Value::String(operator.to_owned())),
        ]);
        self.resolver.render_block(COLUMN_OPERATOR, p, &grid.hash)
    }

    /// Search form for `grid`, registering it first.
    pub fn render_search(
        &mut self,
        grid: &Grid,
        theme: Option<Theme>,
        id: &str,
        grid_params: Map<String, Value>,
    ) -> Result<String, RenderError> {
        self.resolver.init_grid(grid, theme, id, grid_params);
        let view = self.view_with_filters(grid)?;
        let p = params([("grid", to_param(&view)?)]);
        self.resolver.render_block("grid_search", p, &grid.hash)
    }

    /// Pagination widget from the configured view; page `N` links to the
    /// 0-based page `N - 1`.
    pub fn render_pagerfanta(&self, grid: &Grid) -> String {
        let pager = pager_for(grid);
        let base = url::page_url(grid, "");
        let route = |page: u64| format!("{base}{}", page.saturating_sub(1));
        self.ext.view.render(&pager, &route, &self.ext.pager.options)
    }

    pub fn grid_url(&self, section: &str, grid: &Grid, param: Option<&str>) -> Result<String, RenderError> {
        Ok(url::grid_url(section, grid, param)?)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn shallow_view(&self, grid: &Grid) -> GridView {
        GridView::new(grid, self.resolver.instance_id(&grid.hash))
    }

    fn view_with_filters(&mut self, grid: &Grid) -> Result<GridView, RenderError> {
        let mut view = self.shallow_view(grid);
        let shallow = to_param(&view)?;
        for (column_view, column) in view.columns.iter_mut().zip(grid.visible_columns()) {
            if column.filterable {
                column_view.filter_html = self.filter_with(column, grid, &shallow, true)?;
            }
        }
        Ok(view)
    }

    fn full_view(&mut self, grid: &Grid) -> Result<GridView, RenderError> {
        let mut view = self.view_with_filters(grid)?;
        let shallow = to_param(&self.shallow_view(grid))?;
        for (row_view, row) in view.rows.iter_mut().zip(&grid.rows) {
            for column in grid.visible_columns() {
                let html = self.cell_with(column, row, grid, &shallow)?;
                row_view.cells.push(CellView {
                    column: column.id.clone(),
                    html,
                });
            }
        }
        view.pager_html = self.render_pager(grid)?;
        Ok(view)
    }

    fn cell_with(
        &mut self,
        column: &Column,
        row: &Row,
        grid: &Grid,
        shallow: &Value,
    ) -> Result<String, RenderError> {
        let value = column.render_cell(row.field(&column.id));
        let block = self
            .resolver
            .resolve(BlockCategory::Cell, &grid.hash, column)?
            .unwrap_or_else(|| CELL_FALLBACK.to_owned());
        let p = params([
            ("grid", shallow.clone()),
            ("column", to_param(&ColumnView::new(grid, column))?),
            ("row", to_param(&RowView::new(row))?),
            ("value", value),
        ]);
        self.resolver.render_block(&block, p, &grid.hash)
    }

    fn filter_with(
        &mut self,
        column: &Column,
        grid: &Grid,
        shallow: &Value,
        submit_on_change: bool,
    ) -> Result<String, RenderError> {
        let Some(block) = self.resolver.resolve(BlockCategory::Filter, &grid.hash, column)? else {
            return Ok(String::new());
        };
        let p = params([
            ("grid", shallow.clone()),
            ("column", to_param(&ColumnView::new(grid, column))?),
            (
                "submitOnChange",
                Value::Bool(submit_on_change && column.filter_submit_on_change),
            ),
        ]);
        self.resolver.render_block(&block, p, &grid.hash)
    }
}
