//! Per-pass block resolution over an ordered list of template sources.
//!
//! A [`BlockResolver`] lives for one render pass. It owns the pass's mutable
//! state: the active theme, the lazily built source list, and the grids
//! registered through [`BlockResolver::init_grid`]. Nothing here is shared
//! between passes, so two passes rendering grids with colliding hashes never
//! see each other's registrations.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use datagrid_core::{ColumnMeta, Grid, GridHash};

use crate::candidates::{BlockCategory, Candidates};
use crate::error::RenderError;
use crate::store::{RenderTarget, TemplateStore};

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Globals merged at lowest precedence into every block render.
pub fn default_globals() -> Map<String, Value> {
    let globals = json!({
        "grid": null,
        "column": null,
        "row": null,
        "value": null,
        "submitOnChange": null,
        "withjs": true,
        "pagerfanta": false,
        "op": "eq",
    });
    match globals {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// The host engine as seen by the resolver: a store plus global parameters.
#[derive(Clone)]
pub struct Environment {
    store: Arc<dyn TemplateStore>,
    globals: Map<String, Value>,
}

impl Environment {
    /// Environment with [`default_globals`].
    pub fn new(store: Arc<dyn TemplateStore>) -> Self {
        Environment {
            store,
            globals: default_globals(),
        }
    }

    /// Add or override globals.
    pub fn with_globals<I, K>(mut self, globals: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in globals {
            self.globals.insert(key.into(), value);
        }
        self
    }

    pub fn load(&self, reference: &str) -> Result<Arc<dyn RenderTarget>, RenderError> {
        self.store.load(reference)
    }

    pub fn globals(&self) -> &Map<String, Value> {
        &self.globals
    }

    pub fn store(&self) -> &Arc<dyn TemplateStore> {
        &self.store
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Override layer placed ahead of the default template.
#[derive(Clone)]
pub enum Theme {
    /// Loaded from the store on first use.
    ByReference(String),
    /// Already loaded; used as-is.
    Preloaded(Arc<dyn RenderTarget>),
}

impl Theme {
    /// Identifier used in error messages and recorded on grids for exports.
    pub fn name(&self) -> &str {
        match self {
            Theme::ByReference(reference) => reference,
            Theme::Preloaded(target) => target.name(),
        }
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::ByReference(r) => f.debug_tuple("ByReference").field(r).finish(),
            Theme::Preloaded(t) => f.debug_tuple("Preloaded").field(&t.name()).finish(),
        }
    }
}

impl From<&str> for Theme {
    fn from(reference: &str) -> Self {
        Theme::ByReference(reference.to_owned())
    }
}

impl From<String> for Theme {
    fn from(reference: String) -> Self {
        Theme::ByReference(reference)
    }
}

impl From<Arc<dyn RenderTarget>> for Theme {
    fn from(target: Arc<dyn RenderTarget>) -> Self {
        Theme::Preloaded(target)
    }
}

// ---------------------------------------------------------------------------
// BlockResolver
// ---------------------------------------------------------------------------

/// Per-grid state recorded by `init_grid`.
#[derive(Debug, Clone, Default)]
struct Registration {
    instance_id: String,
    params: Map<String, Value>,
}

pub struct BlockResolver<'env> {
    env: &'env Environment,
    default_template: String,
    theme: Option<Theme>,
    sources: Option<Vec<Arc<dyn RenderTarget>>>,
    grids: HashMap<GridHash, Registration>,
}

impl<'env> BlockResolver<'env> {
    pub fn new(env: &'env Environment, default_template: impl Into<String>) -> Self {
        BlockResolver {
            env,
            default_template: default_template.into(),
            theme: None,
            sources: None,
            grids: HashMap::new(),
        }
    }

    pub fn environment(&self) -> &'env Environment {
        self.env
    }

    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// Register `grid` for this pass. An empty `instance_id` falls back to
    /// the grid's own id. Always drops the cached source list, since the
    /// theme may have changed.
    pub fn init_grid(
        &mut self,
        grid: &Grid,
        theme: Option<Theme>,
        instance_id: &str,
        params: Map<String, Value>,
    ) {
        self.theme = theme;
        self.sources = None;

        let instance_id = if instance_id.is_empty() {
            grid.id.clone()
        } else {
            instance_id.to_owned()
        };
        tracing::debug!(grid = %grid.hash, instance_id = %instance_id, "grid registered");
        self.grids.insert(grid.hash.clone(), Registration { instance_id, params });
    }

    /// Instance id registered for `hash`; empty for grids never registered,
    /// which limits them to the generic candidate group.
    pub fn instance_id(&self, hash: &GridHash) -> &str {
        self.grids
            .get(hash)
            .map(|r| r.instance_id.as_str())
            .unwrap_or_default()
    }

    /// Active sources, highest priority first. Built on first use after each
    /// `init_grid`.
    pub fn sources(&mut self) -> Result<&[Arc<dyn RenderTarget>], RenderError> {
        if self.sources.is_none() {
            let mut sources = vec![self.env.load(&self.default_template)?];
            match &self.theme {
                Some(Theme::ByReference(reference)) => sources.insert(0, self.env.load(reference)?),
                Some(Theme::Preloaded(target)) => sources.insert(0, Arc::clone(target)),
                None => {}
            }
            tracing::debug!(
                sources = ?sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
                "template sources loaded"
            );
            self.sources = Some(sources);
        }
        Ok(self.sources.as_deref().unwrap_or_default())
    }

    pub fn has_block(&mut self, name: &str) -> Result<bool, RenderError> {
        Ok(self.sources()?.iter().any(|s| s.has_block(name)))
    }

    /// Render `name` from the first source defining it.
    ///
    /// Parameter precedence, lowest to highest: environment globals,
    /// `parameters`, then the params registered for `grid`.
    pub fn render_block(
        &mut self,
        name: &str,
        parameters: Map<String, Value>,
        grid: &GridHash,
    ) -> Result<String, RenderError> {
        let mut merged = self.env.globals().clone();
        merged.extend(parameters);
        if let Some(registration) = self.grids.get(grid) {
            merged.extend(registration.params.clone());
        }

        let theme = self.theme_name();
        for source in self.sources()? {
            if source.has_block(name) {
                return source.render_block(name, &merged);
            }
        }
        tracing::warn!(block = %name, theme = %theme, "no template source defines block");
        Err(RenderError::UnknownBlock {
            block: name.to_owned(),
            theme,
        })
    }

    /// First defined candidate for `column`, or the category fallback.
    pub fn resolve(
        &mut self,
        category: BlockCategory,
        grid: &GridHash,
        column: &dyn ColumnMeta,
    ) -> Result<Option<String>, RenderError> {
        let candidates = Candidates::build(category, self.instance_id(grid), column);
        for candidate in candidates.iter() {
            if self.has_block(candidate)? {
                tracing::debug!(%category, block = %candidate, "override block resolved");
                return Ok(Some(candidate.to_owned()));
            }
        }
        let fallback = category.fallback().map(str::to_owned);
        tracing::debug!(%category, fallback = ?fallback, "no override block, using fallback");
        Ok(fallback)
    }

    /// Candidate list for `column` paired with whether any source defines each
    /// name, in resolution order.
    pub fn explain(
        &mut self,
        category: BlockCategory,
        grid: &GridHash,
        column: &dyn ColumnMeta,
    ) -> Result<Vec<(String, bool)>, RenderError> {
        let candidates = Candidates::build(category, self.instance_id(grid), column);
        let mut report = Vec::with_capacity(candidates.len());
        for candidate in candidates.iter() {
            report.push((candidate.to_owned(), self.has_block(candidate)?));
        }
        Ok(report)
    }

    fn theme_name(&self) -> String {
        self.theme
            .as_ref()
            .map(|t| t.name().to_owned())
            .unwrap_or_default()
    }
}
