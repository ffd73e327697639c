//! Template sources and the Tera-backed store that loads them.
//!
//! A [`TemplateStore`] hands out [`RenderTarget`]s by reference. The bundled
//! [`TeraStore`] collects sources up front (embedded default theme, template
//! directories, single files, raw strings), splits each into blocks, and
//! compiles every block as its own Tera template named `<source>#<block>.html`
//! so HTML autoescaping applies.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tera::Tera;

use datagrid_core::DEFAULT_TEMPLATE;

use crate::error::RenderError;
use crate::source::parse_blocks;

// ---------------------------------------------------------------------------
// Embedded default theme
// ---------------------------------------------------------------------------

const DEFAULT_BLOCKS: &str = include_str!("templates/blocks.html.tera");

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// A loaded template source.
pub trait RenderTarget: Send + Sync {
    /// Reference the source was loaded under.
    fn name(&self) -> &str;

    fn has_block(&self, block: &str) -> bool;

    fn render_block(&self, block: &str, params: &Map<String, Value>) -> Result<String, RenderError>;

    /// Every block the source defines, sorted.
    fn block_names(&self) -> Vec<String>;
}

/// Loads template sources by reference.
pub trait TemplateStore: Send + Sync {
    fn load(&self, reference: &str) -> Result<Arc<dyn RenderTarget>, RenderError>;

    /// Every reference the store can load, sorted.
    fn references(&self) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// Loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

/// Forward slashes, lowercase. Applied both when registering and when loading.
pub fn normalize_reference(reference: &str) -> String {
    reference.replace('\\', "/").to_lowercase()
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

fn block_template_name(source: &str, block: &str) -> String {
    format!("{source}#{block}.html")
}

// ---------------------------------------------------------------------------
// TeraSource
// ---------------------------------------------------------------------------

/// One source inside a [`TeraStore`]. All sources share the store's compiled
/// Tera instance.
pub struct TeraSource {
    name: String,
    blocks: BTreeSet<String>,
    tera: Arc<Tera>,
}

impl RenderTarget for TeraSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_block(&self, block: &str) -> bool {
        self.blocks.contains(block)
    }

    fn render_block(&self, block: &str, params: &Map<String, Value>) -> Result<String, RenderError> {
        if !self.has_block(block) {
            return Err(RenderError::UnknownBlock {
                block: block.to_owned(),
                theme: self.name.clone(),
            });
        }
        let ctx = tera::Context::from_serialize(params)?;
        Ok(self.tera.render(&block_template_name(&self.name, block), &ctx)?)
    }

    fn block_names(&self) -> Vec<String> {
        self.blocks.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// TeraStore
// ---------------------------------------------------------------------------

/// Immutable store of compiled template sources.
pub struct TeraStore {
    sources: HashMap<String, Arc<TeraSource>>,
}

impl TeraStore {
    pub fn builder() -> TeraStoreBuilder {
        TeraStoreBuilder::default()
    }

    /// Store holding only the embedded default theme.
    pub fn with_defaults() -> Result<Self, RenderError> {
        Self::builder().with_embedded_defaults().build()
    }
}

impl TemplateStore for TeraStore {
    fn load(&self, reference: &str) -> Result<Arc<dyn RenderTarget>, RenderError> {
        let key = normalize_reference(reference);
        match self.sources.get(&key) {
            Some(source) => Ok(source.clone() as Arc<dyn RenderTarget>),
            None => Err(RenderError::TemplateNotFound {
                reference: reference.to_owned(),
            }),
        }
    }

    fn references(&self) -> Vec<String> {
        let mut refs: Vec<String> = self.sources.keys().cloned().collect();
        refs.sort();
        refs
    }
}

/// Collects raw sources, then compiles them in [`TeraStoreBuilder::build`].
///
/// Later registrations under the same reference replace earlier ones.
#[derive(Debug, Default)]
pub struct TeraStoreBuilder {
    raw: BTreeMap<String, String>,
}

impl TeraStoreBuilder {
    /// Register the bundled theme under [`DEFAULT_TEMPLATE`].
    pub fn with_embedded_defaults(self) -> Self {
        self.add_raw(DEFAULT_TEMPLATE, DEFAULT_BLOCKS)
    }

    pub fn add_raw(mut self, reference: &str, content: impl Into<String>) -> Self {
        self.raw.insert(normalize_reference(reference), content.into());
        self
    }

    /// Register every `*.tera` file under `dir`, named by its relative path.
    /// A missing directory registers nothing.
    pub fn add_dir(mut self, dir: &Path) -> Result<Self, RenderError> {
        if !dir.exists() {
            tracing::debug!(dir = %dir.display(), "template dir missing, skipped");
            return Ok(self);
        }
        let mut files = Vec::new();
        collect_template_files(dir, &mut files)?;
        for path in files {
            if path.extension().and_then(|s| s.to_str()) != Some("tera") {
                continue;
            }
            let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
            let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            self.raw
                .insert(normalize_reference(&rel.to_string_lossy()), contents);
        }
        Ok(self)
    }

    /// Register a single file under its path as given.
    pub fn add_file(self, path: &Path) -> Result<Self, RenderError> {
        let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
        Ok(self.add_raw(&path.to_string_lossy(), contents))
    }

    pub fn build(self) -> Result<TeraStore, RenderError> {
        let mut block_sets = Vec::with_capacity(self.raw.len());
        let mut templates = Vec::new();
        for (name, text) in &self.raw {
            let blocks = parse_blocks(name, text)?;
            let names: BTreeSet<String> = blocks.keys().cloned().collect();
            for (block, body) in blocks {
                templates.push((block_template_name(name, &block), body));
            }
            block_sets.push((name.clone(), names));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(templates)?;
        let tera = Arc::new(tera);

        let sources: HashMap<String, Arc<TeraSource>> = block_sets
            .into_iter()
            .map(|(name, blocks)| {
                tracing::debug!(source = %name, blocks = blocks.len(), "template source compiled");
                let source = TeraSource {
                    name: name.clone(),
                    blocks,
                    tera: Arc::clone(&tera),
                };
                (name, Arc::new(source))
            })
            .collect();
        Ok(TeraStore { sources })
    }
}
