//! Pagination widget rendering.
//!
//! [`Pager`] carries the three numbers a view needs; [`PaginationView`]
//! turns it into markup given a page → URL generator. The bundled
//! [`DefaultView`] prints previous/next links around a window of page numbers.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::RenderError;

/// Position within a paginated result set. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub total_count: u64,
    pub max_per_page: u64,
    pub current_page: u64,
}

impl Pager {
    /// At least one page, even for empty results or an unlimited page size.
    pub fn nb_pages(&self) -> u64 {
        if self.max_per_page == 0 {
            return 1;
        }
        self.total_count.div_ceil(self.max_per_page).max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.nb_pages()
    }
}

/// Renders a [`Pager`] given a 1-based page → URL generator.
pub trait PaginationView: Send + Sync {
    fn render(
        &self,
        pager: &Pager,
        route: &dyn Fn(u64) -> String,
        options: &BTreeMap<String, Value>,
    ) -> String;
}

/// Resolve a configured view name.
pub fn view_by_name(name: &str) -> Result<Box<dyn PaginationView>, RenderError> {
    match name {
        "default" => Ok(Box::new(DefaultView)),
        other => Err(RenderError::UnknownPagerView(other.to_owned())),
    }
}

/// `<nav class="pagination">` with prev/next links and a page window.
///
/// Options: `prev_message`, `next_message` (strings), `proximity` (pages
/// shown on each side of the current one, default 2).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultView;

fn option_str<'a>(options: &'a BTreeMap<String, Value>, key: &str, default: &'a str) -> &'a str {
    options.get(key).and_then(Value::as_str).unwrap_or(default)
}

impl PaginationView for DefaultView {
    fn render(
        &self,
        pager: &Pager,
        route: &dyn Fn(u64) -> String,
        options: &BTreeMap<String, Value>,
    ) -> String {
        let prev = option_str(options, "prev_message", "&larr; Previous");
        let next = option_str(options, "next_message", "Next &rarr;");
        let proximity = options.get("proximity").and_then(Value::as_u64).unwrap_or(2);

        let last = pager.nb_pages();
        let current = pager.current_page.clamp(1, last);
        let start = current.saturating_sub(proximity).max(1);
        let end = current.saturating_add(proximity).min(last);

        let mut html = String::from("<nav class=\"pagination\">");
        if pager.has_previous() {
            html.push_str(&format!("<a class=\"prev\" href=\"{}\">{prev}</a>", route(current - 1)));
        } else {
            html.push_str(&format!("<span class=\"prev disabled\">{prev}</span>"));
        }
        for page in start..=end {
            if page == current {
                html.push_str(&format!("<span class=\"current\">{page}</span>"));
            } else {
                html.push_str(&format!("<a href=\"{}\">{page}</a>", route(page)));
            }
        }
        if pager.has_next() {
            html.push_str(&format!("<a class=\"next\" href=\"{}\">{next}</a>", route(current + 1)));
        } else {
            html.push_str(&format!("<span class=\"next disabled\">{next}</span>"));
        }
        html.push_str("</nav>");
        html
    }
}
