//! Splits a template source into independently renderable blocks.
//!
//! A source is plain Tera text containing `{% block NAME %} … {% endblock %}`
//! sections. Blocks may nest and the closing tag may omit the name; Tera
//! itself requires the name, so every closing tag is rewritten to the named
//! form before bodies are extracted. A nested block therefore appears twice:
//! once as its own entry and once inline inside its parent's body, where Tera
//! renders it in place.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{BlockSyntaxError, RenderError};

static BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{%(-?)\s*(endblock|block)\b\s*([A-Za-z0-9_]*)\s*(-?)%\}")
        .expect("block tag pattern is valid")
});

/// Every block defined in `text`, keyed by name, with normalised bodies.
pub fn parse_blocks(source_name: &str, text: &str) -> Result<BTreeMap<String, String>, RenderError> {
    split(text).map_err(|error| RenderError::Blocks {
        source_name: source_name.to_owned(),
        error,
    })
}

fn split(text: &str) -> Result<BTreeMap<String, String>, BlockSyntaxError> {
    let mut out = String::with_capacity(text.len());
    // (name, body start in `out`, opening tag ends with `-%}`)
    let mut open: Vec<(String, usize, bool)> = Vec::new();
    let mut blocks = BTreeMap::new();
    let mut last = 0;

    for caps in BLOCK_TAG.captures_iter(text) {
        let Some(tag) = caps.get(0) else { continue };
        out.push_str(&text[last..tag.start()]);
        last = tag.end();

        let name = &caps[3];
        if &caps[2] == "block" {
            if name.is_empty() {
                return Err(BlockSyntaxError::MissingName(tag.start()));
            }
            out.push_str(tag.as_str());
            open.push((name.to_owned(), out.len(), &caps[4] == "-"));
            continue;
        }

        let (current, body_start, trim_start) = open
            .pop()
            .ok_or(BlockSyntaxError::UnexpectedEnd(tag.start()))?;
        if !name.is_empty() && name != current {
            return Err(BlockSyntaxError::Mismatched {
                open: current,
                found: name.to_owned(),
            });
        }
        // A standalone block template no longer contains its own tags, so
        // their dashes are applied to the body here.
        let mut body = &out[body_start..];
        if trim_start {
            body = body.trim_start();
        }
        if &caps[1] == "-" {
            body = body.trim_end();
        }
        let body = body.to_owned();
        out.push_str(&format!("{{%{} endblock {} {}%}}", &caps[1], current, &caps[4]));
        if blocks.insert(current.clone(), body).is_some() {
            return Err(BlockSyntaxError::Duplicate(current));
        }
    }

    if let Some((name, _, _)) = open.pop() {
        return Err(BlockSyntaxError::Unclosed(name));
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(text: &str) -> BTreeMap<String, String> {
        parse_blocks("test.html.tera", text).expect("parse")
    }

    fn syntax_error(text: &str) -> BlockSyntaxError {
        match parse_blocks("test.html.tera", text) {
            Err(RenderError::Blocks { error, .. }) => error,
            other => panic!("expected block syntax error, got {other:?}"),
        }
    }

    #[test]
    fn splits_top_level_blocks() {
        let b = blocks("{% block a %}A{% endblock %}\n{% block b %}B{% endblock b %}");
        assert_eq!(b.len(), 2);
        assert_eq!(b["a"], "A");
        assert_eq!(b["b"], "B");
    }

    #[test]
    fn nested_blocks_are_addressable_and_named_inline() {
        let b = blocks("{% block outer %}<{% block inner %}x{% endblock %}>{% endblock %}");
        assert_eq!(b["inner"], "x");
        assert_eq!(b["outer"], "<{% block inner %}x{% endblock inner %}>");
    }

    #[test]
    fn whitespace_control_survives_normalisation() {
        let b = blocks("{%- block a -%}{% block b %}{%- endblock -%}{% endblock a %}");
        assert_eq!(b["a"], "{% block b %}{%- endblock b -%}");
    }

    #[test]
    fn outer_dashes_trim_the_extracted_body() {
        let b = blocks("{%- block a -%}   X   {%- endblock -%}\n{% block b -%}\n Y \n{% endblock %}");
        assert_eq!(b["a"], "X");
        assert_eq!(b["b"], "Y \n");
    }

    #[test]
    fn text_outside_blocks_is_ignored() {
        let b = blocks("{# header #}\nplain {{ x }}\n{% block only %}y{% endblock %}");
        assert_eq!(b.keys().collect::<Vec<_>>(), vec!["only"]);
    }

    #[test]
    fn rejects_structural_errors() {
        assert_eq!(syntax_error("{% block a %}"), BlockSyntaxError::Unclosed("a".into()));
        assert!(matches!(syntax_error("x{% endblock %}"), BlockSyntaxError::UnexpectedEnd(1)));
        assert!(matches!(
            syntax_error("{% block a %}{% endblock b %}"),
            BlockSyntaxError::Mismatched { .. }
        ));
        assert_eq!(
            syntax_error("{% block a %}{% endblock %}{% block a %}{% endblock %}"),
            BlockSyntaxError::Duplicate("a".into())
        );
        assert!(matches!(syntax_error("{% block %}{% endblock %}"), BlockSyntaxError::MissingName(0)));
    }

    #[test]
    fn error_names_the_source() {
        let err = parse_blocks("themes/admin.html.tera", "{% block a %}").unwrap_err();
        assert!(err.to_string().contains("themes/admin.html.tera"));
    }
}
