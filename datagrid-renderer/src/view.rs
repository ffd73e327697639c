//! Block parameters: serializable views of a [`Grid`] and its parts.
//!
//! Blocks see plain data, never the domain types. `*_html` fields are empty
//! in shallow views and filled with pre-rendered sub-blocks when a full grid
//! or search form is rendered, so overrides of cell, filter, and pager blocks
//! show up inside the full grid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use datagrid_core::{url, Column, ColumnMeta, Grid, Row};

use crate::error::RenderError;
use crate::pagination::Pager;

/// Prebuilt grid URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridUrls {
    pub reset: String,
    pub limit: String,
    /// Page URL without a value; append a 0-based page number.
    pub page: String,
    /// Empty on the first page.
    pub previous: String,
    /// Empty on the last page.
    pub next: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnView {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub parent_type: Option<String>,
    pub filter_type: Option<String>,
    pub render_block_id: String,
    pub sortable: bool,
    pub sorted: bool,
    pub order: Option<String>,
    pub order_url: String,
    pub filterable: bool,
    pub filter_submit_on_change: bool,
    pub values: BTreeMap<String, String>,
    pub filter_html: String,
}

impl ColumnView {
    pub fn new(grid: &Grid, column: &Column) -> Self {
        ColumnView {
            id: column.id.clone(),
            title: column.title.clone(),
            column_type: column.column_type.clone(),
            parent_type: column.parent_type.clone(),
            filter_type: column.filter_type.clone(),
            render_block_id: column.render_block_id().to_owned(),
            sortable: column.sortable,
            sorted: column.is_sorted(),
            order: column.order.map(|o| o.to_string()),
            order_url: url::order_url(grid, column),
            filterable: column.filterable,
            filter_submit_on_change: column.filter_submit_on_change,
            values: column.values.clone(),
            filter_html: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellView {
    pub column: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowView {
    pub fields: BTreeMap<String, Value>,
    pub cells: Vec<CellView>,
}

impl RowView {
    pub fn new(row: &Row) -> Self {
        RowView {
            fields: row.fields.clone(),
            cells: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridView {
    pub hash: String,
    pub id: String,
    pub instance_id: String,
    pub route_url: String,
    pub total_count: u64,
    /// 0-based, as stored on the grid.
    pub page: u64,
    /// 1-based, for display.
    pub page_number: u64,
    pub limit: u64,
    pub nb_pages: u64,
    pub columns: Vec<ColumnView>,
    pub rows: Vec<RowView>,
    pub has_filters: bool,
    pub urls: GridUrls,
    pub pager_html: String,
}

impl GridView {
    /// Shallow view: no pre-rendered cells, filters, or pager.
    pub fn new(grid: &Grid, instance_id: &str) -> Self {
        let pager = pager_for(grid);
        let page_url = url::page_url(grid, "");
        let previous = if pager.has_previous() {
            format!("{page_url}{}", grid.page - 1)
        } else {
            String::new()
        };
        let next = if pager.has_next() {
            format!("{page_url}{}", grid.page.saturating_add(1))
        } else {
            String::new()
        };
        let columns: Vec<ColumnView> = grid
            .visible_columns()
            .map(|c| ColumnView::new(grid, c))
            .collect();
        GridView {
            hash: grid.hash.to_string(),
            id: grid.id.clone(),
            instance_id: instance_id.to_owned(),
            route_url: grid.route_url.clone(),
            total_count: grid.total_count,
            page: grid.page,
            page_number: pager.current_page,
            limit: grid.limit,
            nb_pages: pager.nb_pages(),
            has_filters: columns.iter().any(|c| c.filterable),
            columns,
            rows: grid.rows.iter().map(RowView::new).collect(),
            urls: GridUrls {
                reset: url::reset_url(grid),
                limit: url::limit_url(grid),
                page: page_url,
                previous,
                next,
            },
            pager_html: String::new(),
        }
    }
}

/// Pager position for `grid`; the grid stores a 0-based page.
pub fn pager_for(grid: &Grid) -> Pager {
    Pager {
        total_count: grid.total_count,
        max_per_page: grid.limit,
        current_page: grid.page.saturating_add(1),
    }
}

/// Serialize `value` into a block parameter.
pub fn to_param<T: Serialize>(value: &T) -> Result<Value, RenderError> {
    serde_json::to_value(value).map_err(RenderError::from)
}

/// Build a parameter map from `(key, value)` pairs.
pub fn params<I, K>(pairs: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
