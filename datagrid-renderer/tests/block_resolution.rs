//! Override resolution order across theme and default sources.

use datagrid_core::{Column, Grid, Row, DEFAULT_TEMPLATE};
use datagrid_renderer::{BlockCategory, DataGridExtension, Environment, RenderError, TeraStore, Theme};
use rstest::rstest;
use serde_json::{json, Map};
use std::sync::Arc;

const THEME: &str = "theme.html.tera";

fn extension(theme_blocks: &[&str]) -> DataGridExtension {
    let theme: String = theme_blocks
        .iter()
        .map(|b| format!("{{% block {b} %}}{b}:{{{{ value }}}}{{% endblock %}}\n"))
        .collect();
    let store = TeraStore::builder()
        .with_embedded_defaults()
        .add_raw(THEME, theme)
        .build()
        .expect("store builds");
    DataGridExtension::new(Environment::new(Arc::new(store)), DEFAULT_TEMPLATE)
}

fn grid() -> Grid {
    let mut grid = Grid::new("g1", "/orders");
    grid.columns = vec![date_column()];
    grid
}

fn date_column() -> Column {
    Column::new("created", "date")
        .with_render_block_id("c3")
        .with_parent_type("text")
        .with_filter_type("input")
}

fn row() -> Row {
    [("created", json!("2024-05-01"))].into_iter().collect()
}

fn resolve_cell(ext: &DataGridExtension, id: &str) -> Option<String> {
    let grid = grid();
    let mut pass = ext.pass();
    let resolver = pass.resolver();
    resolver.init_grid(&grid, Some(THEME.into()), id, Map::new());
    resolver
        .resolve(BlockCategory::Cell, &grid.hash, &date_column())
        .expect("resolve")
}

#[test]
fn type_override_in_theme_wins_without_instance_id() {
    let ext = extension(&["grid_column_type_date_cell"]);
    let grid = grid();
    let mut pass = ext.pass();
    pass.resolver().init_grid(&grid, Some(THEME.into()), "", Map::new());

    let html = pass.render_cell(&grid.columns[0], &row(), &grid).unwrap();
    assert_eq!(html, "grid_column_type_date_cell:2024-05-01");
}

#[test]
fn instance_id_without_scoped_blocks_falls_through_to_generic() {
    let ext = extension(&["grid_column_type_date_cell"]);
    assert_eq!(
        resolve_cell(&ext, "orders").as_deref(),
        Some("grid_column_type_date_cell")
    );
}

#[rstest]
#[case::most_specific(&["grid_column_c3_cell", "grid_column_date_cell"], "", "grid_column_c3_cell")]
#[case::type_before_parent(&["grid_column_text_cell", "grid_column_date_cell"], "", "grid_column_date_cell")]
#[case::named_before_id(&["grid_column_id_c3_cell", "grid_column_text_cell"], "", "grid_column_text_cell")]
#[case::parent_type_last(&["grid_column_type_text_cell"], "", "grid_column_type_text_cell")]
#[case::scoped_group_wins_as_unit(
    &["grid_orders_column_type_text_cell", "grid_column_c3_cell"],
    "orders",
    "grid_orders_column_type_text_cell"
)]
#[case::scoped_ignored_without_id(&["grid_orders_column_c3_cell", "grid_column_type_date_cell"], "", "grid_column_type_date_cell")]
#[case::other_instance_ignored(&["grid_users_column_c3_cell"], "orders", "grid_column_cell")]
#[case::fallback(&[], "orders", "grid_column_cell")]
fn cell_resolution_order(#[case] blocks: &[&str], #[case] id: &str, #[case] expected: &str) {
    let ext = extension(blocks);
    assert_eq!(resolve_cell(&ext, id).as_deref(), Some(expected));
}

#[test]
fn resolution_is_deterministic() {
    let ext = extension(&["grid_column_date_cell", "grid_column_type_text_cell"]);
    let first = resolve_cell(&ext, "orders");
    for _ in 0..5 {
        assert_eq!(resolve_cell(&ext, "orders"), first);
    }
}

#[test]
fn default_theme_alone_renders_any_cell() {
    let ext = DataGridExtension::with_defaults().unwrap();
    let mut grid = grid();
    grid.columns.push(Column::new("weird.col", "made_up_type"));
    let row: Row = [("created", json!("<x>")), ("weird.col", json!(3))].into_iter().collect();
    let mut pass = ext.pass();
    assert_eq!(pass.render_cell(&grid.columns[0], &row, &grid).unwrap(), "&lt;x&gt;");
    assert_eq!(pass.render_cell(&grid.columns[1], &row, &grid).unwrap(), "3");
}

#[test]
fn unresolved_filter_renders_empty_string() {
    let ext = extension(&[]);
    let grid = grid();
    let column = Column::new("created", "date");
    let mut pass = ext.pass();
    pass.resolver().init_grid(&grid, Some(THEME.into()), "orders", Map::new());
    assert_eq!(pass.render_filter(&column, &grid, true).unwrap(), "");
}

#[test]
fn filter_scoped_group_wins_as_unit() {
    let ext = extension(&["grid_orders_column_filter_type_input", "grid_column_c3_filter"]);
    let grid = grid();
    let mut pass = ext.pass();
    let resolver = pass.resolver();
    resolver.init_grid(&grid, Some(THEME.into()), "orders", Map::new());
    let hit = resolver
        .resolve(BlockCategory::Filter, &grid.hash, &date_column())
        .unwrap();
    assert_eq!(hit.as_deref(), Some("grid_orders_column_filter_type_input"));

    resolver.init_grid(&grid, Some(THEME.into()), "", Map::new());
    let hit = resolver
        .resolve(BlockCategory::Filter, &grid.hash, &date_column())
        .unwrap();
    assert_eq!(hit.as_deref(), Some("grid_column_c3_filter"));
}

#[test]
fn filter_falls_back_to_default_filter_type_block() {
    let ext = extension(&[]);
    let grid = grid();
    let mut pass = ext.pass();
    let html = pass.render_filter(&grid.columns[0], &grid, true).unwrap();
    assert!(html.contains(r#"name="g1[created][from]""#), "{html}");
    assert!(html.contains("onchange"), "{html}");

    let quiet = pass.render_filter(&grid.columns[0], &grid, false).unwrap();
    assert!(!quiet.contains("onchange"), "{quiet}");
}

#[test]
fn explain_reports_every_candidate_in_order() {
    let ext = extension(&["grid_column_type_date_cell"]);
    let grid = grid();
    let mut pass = ext.pass();
    let resolver = pass.resolver();
    resolver.init_grid(&grid, Some(THEME.into()), "orders", Map::new());
    let report = resolver
        .explain(BlockCategory::Cell, &grid.hash, &date_column())
        .unwrap();
    assert_eq!(report.len(), 12);
    assert_eq!(report[0], ("grid_orders_column_c3_cell".to_owned(), false));
    let hits: Vec<&str> = report.iter().filter(|(_, hit)| *hit).map(|(n, _)| n.as_str()).collect();
    assert_eq!(hits, vec!["grid_column_type_date_cell"]);
}

#[test]
fn column_operator_always_uses_fixed_block() {
    let ext = extension(&["grid_column_operator"]);
    let grid = grid();
    let mut pass = ext.pass();
    pass.resolver().init_grid(&grid, Some(THEME.into()), "", Map::new());
    let html = pass
        .render_column_operator(&grid.columns[0], &grid, "like", true)
        .unwrap();
    assert_eq!(html, "grid_column_operator:");

    let mut pass = ext.pass();
    let html = pass
        .render_column_operator(&grid.columns[0], &grid, "like", false)
        .unwrap();
    assert!(html.contains(r#"<option value="like" selected="selected">"#), "{html}");
    assert!(!html.contains("onchange"), "{html}");
}

#[test]
fn missing_block_is_a_configuration_error() {
    let ext = extension(&[]);
    let grid = grid();
    let mut pass = ext.pass();
    pass.resolver().init_grid(&grid, Some(Theme::from(THEME)), "", Map::new());
    let err = pass.render_grid_block("nonexistent", &grid).unwrap_err();
    assert!(matches!(err, RenderError::UnknownBlock { .. }), "got: {err}");
    let msg = err.to_string();
    assert!(msg.contains("grid_nonexistent") && msg.contains(THEME), "{msg}");
}
