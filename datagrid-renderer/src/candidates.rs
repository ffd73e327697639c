//! Candidate block names for cell and filter overrides.
//!
//! Candidates come in two groups: the instance-scoped group
//! (`grid_<id>_column_…`), present only when the grid has a non-empty
//! instance id, followed by the generic group (`grid_column_…`). Resolution is
//! find-first over the concatenation, so any hit in the scoped group beats
//! every generic name, and a scoped miss falls through to the generic group
//! exactly as if no id had been set.
//!
//! Within a group, names run from most to least specific:
//!
//! | cell                                 | filter                              |
//! |--------------------------------------|-------------------------------------|
//! | `column_<render_block_id>_cell`      | `column_<render_block_id>_filter`   |
//! | `column_<type>_cell`                 | `column_id_<render_block_id>_filter`|
//! | `column_<parent_type>_cell`          | `column_type_<type>_filter`         |
//! | `column_id_<render_block_id>_cell`   | `column_type_<parent_type>_filter`  |
//! | `column_type_<type>_cell`            | `column_filter_type_<filter_type>`  |
//! | `column_type_<parent_type>_cell`     |                                     |
//!
//! Entries built from a missing `parent_type` or `filter_type` are skipped.

use std::fmt;

use datagrid_core::ColumnMeta;

/// Block used when no cell candidate is defined anywhere.
pub const CELL_FALLBACK: &str = "grid_column_cell";

/// Fixed block for column operator selectors.
pub const COLUMN_OPERATOR: &str = "grid_column_operator";

/// Kind of per-column block being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCategory {
    Cell,
    Filter,
}

impl BlockCategory {
    /// Name rendered when every candidate misses; filters have none.
    pub fn fallback(self) -> Option<&'static str> {
        match self {
            BlockCategory::Cell => Some(CELL_FALLBACK),
            BlockCategory::Filter => None,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            BlockCategory::Cell => "cell",
            BlockCategory::Filter => "filter",
        }
    }

    fn patterns(self) -> &'static [Pattern] {
        use Field::*;
        use Pattern::*;
        match self {
            BlockCategory::Cell => &[
                Named(RenderBlockId),
                Named(Type),
                Named(ParentType),
                ById(RenderBlockId),
                ByType(Type),
                ByType(ParentType),
            ],
            BlockCategory::Filter => &[
                Named(RenderBlockId),
                ById(RenderBlockId),
                ByType(Type),
                ByType(ParentType),
                ByFilterType(FilterType),
            ],
        }
    }
}

impl fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl std::str::FromStr for BlockCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cell" => Ok(BlockCategory::Cell),
            "filter" => Ok(BlockCategory::Filter),
            other => Err(format!("unknown block category '{other}'; expected: cell, filter")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Field {
    RenderBlockId,
    Type,
    ParentType,
    FilterType,
}

impl Field {
    fn read<'a>(self, column: &'a dyn ColumnMeta) -> Option<&'a str> {
        match self {
            Field::RenderBlockId => Some(column.render_block_id()),
            Field::Type => Some(column.column_type()),
            Field::ParentType => column.parent_type(),
            Field::FilterType => column.filter_type(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
    /// `column_<v>_<suffix>`
    Named(Field),
    /// `column_id_<v>_<suffix>`
    ById(Field),
    /// `column_type_<v>_<suffix>`
    ByType(Field),
    /// `column_filter_type_<v>`
    ByFilterType(Field),
}

impl Pattern {
    fn build(self, prefix: &str, category: BlockCategory, column: &dyn ColumnMeta) -> Option<String> {
        let suffix = category.suffix();
        Some(match self {
            Pattern::Named(f) => format!("{prefix}column_{}_{suffix}", f.read(column)?),
            Pattern::ById(f) => format!("{prefix}column_id_{}_{suffix}", f.read(column)?),
            Pattern::ByType(f) => format!("{prefix}column_type_{}_{suffix}", f.read(column)?),
            Pattern::ByFilterType(f) => format!("{prefix}column_filter_type_{}", f.read(column)?),
        })
    }
}

/// Ordered candidate names, grouped by scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    /// `grid_<id>_…` names; empty when the instance id is empty.
    pub scoped: Vec<String>,
    /// `grid_…` names.
    pub generic: Vec<String>,
}

impl Candidates {
    pub fn build(category: BlockCategory, instance_id: &str, column: &dyn ColumnMeta) -> Self {
        let group = |prefix: &str| -> Vec<String> {
            category
                .patterns()
                .iter()
                .filter_map(|p| p.build(prefix, category, column))
                .collect()
        };
        let scoped = if instance_id.is_empty() {
            Vec::new()
        } else {
            group(&format!("grid_{instance_id}_"))
        };
        Candidates {
            scoped,
            generic: group("grid_"),
        }
    }

    /// Every candidate in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scoped.iter().chain(&self.generic).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scoped.len() + self.generic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
