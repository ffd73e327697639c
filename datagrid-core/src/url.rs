//! Grid action URLs.
//!
//! Every URL is the grid's route with one namespaced query parameter appended:
//!
//! ```text
//! <route_url>?<hash>[<key>]=<value>     (route without a query string)
//! <route_url>&<hash>[<key>]=<value>     (route already carrying one)
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::{Column, Grid, SortOrder};

pub const REQUEST_QUERY_ORDER: &str = "_order";
pub const REQUEST_QUERY_PAGE: &str = "_page";
pub const REQUEST_QUERY_LIMIT: &str = "_limit";
pub const REQUEST_QUERY_RESET: &str = "_reset";
pub const REQUEST_QUERY_EXPORT: &str = "__export_id";

/// The grid setting a URL changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlSection {
    Order,
    Page,
    Limit,
    Reset,
    Export,
}

impl UrlSection {
    pub fn query_key(self) -> &'static str {
        match self {
            UrlSection::Order => REQUEST_QUERY_ORDER,
            UrlSection::Page => REQUEST_QUERY_PAGE,
            UrlSection::Limit => REQUEST_QUERY_LIMIT,
            UrlSection::Reset => REQUEST_QUERY_RESET,
            UrlSection::Export => REQUEST_QUERY_EXPORT,
        }
    }
}

impl FromStr for UrlSection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(UrlSection::Order),
            "page" => Ok(UrlSection::Page),
            "limit" => Ok(UrlSection::Limit),
            "reset" => Ok(UrlSection::Reset),
            "export" => Ok(UrlSection::Export),
            other => Err(CoreError::UnsupportedSection(other.to_owned())),
        }
    }
}

impl fmt::Display for UrlSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UrlSection::Order => "order",
            UrlSection::Page => "page",
            UrlSection::Limit => "limit",
            UrlSection::Reset => "reset",
            UrlSection::Export => "export",
        };
        f.write_str(s)
    }
}

fn prefix(grid: &Grid, section: UrlSection) -> String {
    let sep = if grid.route_url.contains('?') { '&' } else { '?' };
    format!("{}{}{}[{}]=", grid.route_url, sep, grid.hash, section.query_key())
}

/// URL that sorts the grid by `column`, flipping the direction when the
/// column is already sorted ascending.
pub fn order_url(grid: &Grid, column: &Column) -> String {
    let direction = match column.order {
        Some(order) => order.toggled(),
        None => SortOrder::Asc,
    };
    format!("{}{}|{}", prefix(grid, UrlSection::Order), column.id, direction)
}

/// URL that jumps to `page`, passed through verbatim.
pub fn page_url(grid: &Grid, page: &str) -> String {
    prefix(grid, UrlSection::Page) + page
}

/// URL that clears the per-page limit.
pub fn limit_url(grid: &Grid) -> String {
    prefix(grid, UrlSection::Limit)
}

/// URL that resets every grid setting.
pub fn reset_url(grid: &Grid) -> String {
    prefix(grid, UrlSection::Reset)
}

/// URL that triggers the export identified by `export_id`.
pub fn export_url(grid: &Grid, export_id: &str) -> String {
    prefix(grid, UrlSection::Export) + export_id
}

/// String-dispatched form used by templates and the CLI.
///
/// `param` is the column id for `order`, the page or export id for `page`
/// and `export`, and ignored otherwise.
pub fn grid_url(section: &str, grid: &Grid, param: Option<&str>) -> Result<String, CoreError> {
    let section: UrlSection = section.parse()?;
    let param = param.unwrap_or_default();
    Ok(match section {
        UrlSection::Order => {
            let column = grid.column(param).ok_or_else(|| CoreError::ColumnNotFound {
                grid: grid.hash.to_string(),
                column: param.to_owned(),
            })?;
            order_url(grid, column)
        }
        UrlSection::Page => page_url(grid, param),
        UrlSection::Limit => limit_url(grid),
        UrlSection::Reset => reset_url(grid),
        UrlSection::Export => export_url(grid, param),
    })
}
