//! Domain types for grids, columns, and rows.
//!
//! All types are serializable/deserializable via serde so a grid description
//! can be loaded from YAML or JSON and handed straight to the renderer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque identity of a grid. Also used as the query-string namespace in
/// every URL the grid builds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridHash(pub String);

impl fmt::Display for GridHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for GridHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GridHash {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Direction of a sorted column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// The direction a click on the column header switches to.
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnMeta
// ---------------------------------------------------------------------------

/// Read-only view of the column fields that drive block-name resolution.
pub trait ColumnMeta {
    /// Identifier used in `grid_column_<id>_*` and `grid_column_id_<id>_*` names.
    fn render_block_id(&self) -> &str;

    /// Column type (`text`, `date`, `number`, ...).
    fn column_type(&self) -> &str;

    /// Type the column type derives from, if any.
    fn parent_type(&self) -> Option<&str>;

    /// Filter widget type (`input`, `select`, ...), if the column is filterable.
    fn filter_type(&self) -> Option<&str>;
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// A single grid column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default = "Column::default_type")]
    pub column_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    /// Explicit block id; derived from `id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_block_id: Option<String>,
    #[serde(default = "default_true")]
    pub sortable: bool,
    /// Current sort direction; `None` when the grid is not sorted by this column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(default = "default_true")]
    pub filterable: bool,
    #[serde(default = "default_true")]
    pub filter_submit_on_change: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Display replacements keyed by the raw value's string form.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,
}

impl Column {
    fn default_type() -> String {
        "text".to_owned()
    }

    /// Minimal text column with every flag at its default.
    pub fn new(id: impl Into<String>, column_type: impl Into<String>) -> Self {
        let id = id.into();
        Column {
            title: id.clone(),
            id,
            column_type: column_type.into(),
            parent_type: None,
            filter_type: None,
            render_block_id: None,
            sortable: true,
            order: None,
            filterable: true,
            filter_submit_on_change: true,
            visible: true,
            values: BTreeMap::new(),
        }
    }

    pub fn with_parent_type(mut self, parent_type: impl Into<String>) -> Self {
        self.parent_type = Some(parent_type.into());
        self
    }

    pub fn with_filter_type(mut self, filter_type: impl Into<String>) -> Self {
        self.filter_type = Some(filter_type.into());
        self
    }

    pub fn with_render_block_id(mut self, id: impl Into<String>) -> Self {
        self.render_block_id = Some(id.into());
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn is_sorted(&self) -> bool {
        self.order.is_some()
    }

    /// Turns a raw row value into the value handed to cell blocks.
    ///
    /// A matching entry in `values` replaces the raw value; everything else
    /// passes through unchanged.
    pub fn render_cell(&self, raw: &Value) -> Value {
        if self.values.is_empty() {
            return raw.clone();
        }
        let key = match raw {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        match self.values.get(&key) {
            Some(replacement) => Value::String(replacement.clone()),
            None => raw.clone(),
        }
    }
}

impl ColumnMeta for Column {
    fn render_block_id(&self) -> &str {
        match &self.render_block_id {
            Some(id) => id,
            None => &self.id,
        }
    }

    fn column_type(&self) -> &str {
        &self.column_type
    }

    fn parent_type(&self) -> Option<&str> {
        self.parent_type.as_deref()
    }

    fn filter_type(&self) -> Option<&str> {
        self.filter_type.as_deref()
    }
}

/// One data row: field name → raw value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub fields: BTreeMap<String, Value>,
}

static NULL: Value = Value::Null;

impl Row {
    /// Raw value of `field`; null when the row does not carry it.
    pub fn field(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&NULL)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Row {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A grid ready to be rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub hash: GridHash,
    /// The grid's own id; used as instance id when the caller passes none.
    #[serde(default)]
    pub id: String,
    pub route_url: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub total_count: u64,
    /// Current page, 0-based.
    #[serde(default)]
    pub page: u64,
    #[serde(default = "Grid::default_limit")]
    pub limit: u64,
    /// Theme reference recorded by the last full render, reused by exports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl Grid {
    fn default_limit() -> u64 {
        20
    }

    pub fn new(hash: impl Into<GridHash>, route_url: impl Into<String>) -> Self {
        Grid {
            hash: hash.into(),
            id: String::new(),
            route_url: route_url.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            total_count: 0,
            page: 0,
            limit: Self::default_limit(),
            template: None,
        }
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_block_id_defaults_to_column_id() {
        let col = Column::new("customer.name", "text");
        assert_eq!(col.render_block_id(), "customer.name");
        let col = col.with_render_block_id("customer_name");
        assert_eq!(col.render_block_id(), "customer_name");
    }

    #[test]
    fn render_cell_applies_value_replacements() {
        let mut col = Column::new("active", "boolean");
        col.values.insert("true".into(), "Yes".into());
        assert_eq!(col.render_cell(&json!(true)), json!("Yes"));
        assert_eq!(col.render_cell(&json!(false)), json!(false));
    }

    #[test]
    fn missing_row_field_reads_as_null() {
        let row: Row = [("id", json!(7))].into_iter().collect();
        assert_eq!(row.field("id"), &json!(7));
        assert!(row.field("nope").is_null());
    }

    #[test]
    fn grid_deserializes_with_defaults() {
        let grid: Grid = serde_yaml::from_str(
            "hash: g1\nroute_url: /orders\ncolumns:\n  - id: created\n    type: date\n    order: asc\n",
        )
        .expect("parse grid");
        assert_eq!(grid.hash, GridHash::from("g1"));
        assert_eq!(grid.limit, 20);
        let col = grid.column("created").expect("column");
        assert_eq!(col.order, Some(SortOrder::Asc));
        assert!(col.filter_submit_on_change);
        assert!(col.visible);
    }
}
