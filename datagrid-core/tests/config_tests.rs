//! Config and grid description loading.

use assert_fs::prelude::*;
use datagrid_core::{config, CoreError, SortOrder};
use predicates::prelude::predicate;

#[test]
fn load_missing_config_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = config::load_at(&dir.path().join("datagrid.yaml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("datagrid.yaml"));
}

#[test]
fn load_corrupt_config_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("datagrid.yaml");
    file.write_str(": : corrupt : yaml : !!!\n  - broken: [unclosed").expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, CoreError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("datagrid.yaml"));
}

#[test]
fn full_config_round_trips_fields() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("datagrid.yaml");
    file.write_str(
        "theme: admin.html.tera\n\
         template_dirs: [themes, /abs/themes]\n\
         pagerfanta:\n  enable: true\n  view: default\n  options:\n    prev_message: prev\n\
         globals:\n  op: like\n",
    )
    .expect("write");

    let cfg = config::load_at(file.path()).expect("load");
    assert_eq!(cfg.theme.as_deref(), Some("admin.html.tera"));
    assert_eq!(cfg.template_dirs[0], dir.path().join("themes"));
    assert_eq!(cfg.template_dirs[1], std::path::PathBuf::from("/abs/themes"));
    assert!(cfg.pagerfanta.enable);
    assert_eq!(cfg.pagerfanta.options["prev_message"], "prev");
    assert_eq!(cfg.globals["op"], "like");
    assert_eq!(cfg.default_template, datagrid_core::DEFAULT_TEMPLATE);
}

#[test]
fn grid_description_loads_from_json_and_yaml() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let yaml = dir.child("grid.yaml");
    yaml.write_str(
        "hash: g1\nid: orders\nroute_url: /orders\ntotal_count: 42\nlimit: 10\n\
         columns:\n  - id: created\n    type: date\n    parent_type: text\n    order: desc\n\
         rows:\n  - created: '2024-01-02'\n",
    )
    .expect("write");
    let json = dir.child("grid.json");
    json.write_str(r#"{"hash":"g2","route_url":"/x","columns":[{"id":"a"}]}"#)
        .expect("write");

    let grid = config::load_grid_at(yaml.path()).expect("yaml grid");
    assert_eq!(grid.id, "orders");
    assert_eq!(grid.columns[0].order, Some(SortOrder::Desc));
    assert_eq!(grid.rows[0].field("created"), "2024-01-02");

    let grid = config::load_grid_at(json.path()).expect("json grid");
    assert_eq!(grid.columns[0].column_type, "text");
    json.assert(predicate::str::contains("\"g2\""));
}
