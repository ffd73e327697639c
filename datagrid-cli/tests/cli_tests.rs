use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use predicates::str::contains;

const GRID: &str = r#"
hash: g1
id: orders
route_url: /orders
total_count: 25
limit: 10
page: 1
columns:
  - id: created
    title: Created
    type: date
    parent_type: text
    filter_type: input
    order: asc
  - id: paid
    type: boolean
    filterable: false
rows:
  - created: "2024-05-01"
    paid: true
  - created: "2024-05-02"
    paid: false
"#;

/// Isolated from any real per-user config.
fn datagrid_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("datagrid"));
    cmd.env("HOME", home)
        .env("USERPROFILE", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

fn fixture() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    dir.child("grid.yaml").write_str(GRID).expect("write grid");
    dir
}

#[test]
fn render_prints_full_grid() {
    let dir = fixture();
    datagrid_cmd(dir.path())
        .arg("render")
        .arg(dir.child("grid.yaml").path())
        .assert()
        .success()
        .stdout(contains("grid-table"))
        .stdout(contains("2024-05-02"))
        .stdout(contains(r#"<span class="grid-boolean-true">true</span>"#))
        .stdout(contains("<script"));
}

#[test]
fn render_html_only_drops_script() {
    let dir = fixture();
    datagrid_cmd(dir.path())
        .args(["render", "--html-only"])
        .arg(dir.child("grid.yaml").path())
        .assert()
        .success()
        .stdout(contains("grid-table"))
        .stdout(contains("<script").not());
}

#[test]
fn render_with_theme_file_uses_overrides() {
    let dir = fixture();
    let theme = dir.child("theme.html.tera");
    theme
        .write_str("{% block grid_orders_column_type_date_cell %}<time>{{ value }}</time>{% endblock %}")
        .expect("write theme");

    datagrid_cmd(dir.path())
        .arg("render")
        .arg(dir.child("grid.yaml").path())
        .arg("--theme")
        .arg(theme.path())
        .assert()
        .success()
        .stdout(contains("<time>2024-05-01</time>"));

    // Scoped overrides only apply to the matching instance.
    datagrid_cmd(dir.path())
        .arg("render")
        .arg(dir.child("grid.yaml").path())
        .arg("--theme")
        .arg(theme.path())
        .args(["--id", "archive"])
        .assert()
        .success()
        .stdout(contains("<time>").not());
}

#[test]
fn render_search_and_pager_block() {
    let dir = fixture();
    datagrid_cmd(dir.path())
        .args(["render", "--search"])
        .arg(dir.child("grid.yaml").path())
        .assert()
        .success()
        .stdout(contains("<label>Created</label>"))
        .stdout(contains(r#"name="g1[created][from]""#));

    datagrid_cmd(dir.path())
        .args(["render", "--block", "pager"])
        .arg(dir.child("grid.yaml").path())
        .assert()
        .success()
        .stdout(contains("2 / 3"));
}

#[test]
fn render_unknown_block_fails_with_theme_in_message() {
    let dir = fixture();
    datagrid_cmd(dir.path())
        .args(["render", "--block", "sidebar"])
        .arg(dir.child("grid.yaml").path())
        .assert()
        .failure()
        .stderr(contains(r#"block "grid_sidebar" doesn't exist in grid template"#));
}

#[test]
fn config_template_dirs_and_theme_apply() {
    let dir = fixture();
    dir.child("templates/admin.html.tera")
        .write_str("{% block grid_column_type_boolean_cell %}{% if value %}yes{% else %}no{% endif %}{% endblock %}")
        .expect("write theme");
    dir.child("datagrid.yaml")
        .write_str("template_dirs: [templates]\ntheme: admin.html.tera\n")
        .expect("write config");

    datagrid_cmd(dir.path())
        .args(["render", "--html-only", "--config"])
        .arg(dir.child("datagrid.yaml").path())
        .arg(dir.child("grid.yaml").path())
        .assert()
        .success()
        .stdout(contains(">yes</td>"))
        .stdout(contains(">no</td>"));
}

#[test]
fn user_config_is_picked_up_from_config_dir() {
    let dir = fixture();
    dir.child(".config/datagrid/config.yaml")
        .write_str("pagerfanta:\n  enable: true\n")
        .expect("write config");

    datagrid_cmd(dir.path())
        .args(["render", "--html-only"])
        .arg(dir.child("grid.yaml").path())
        .assert()
        .success()
        .stdout(contains(r#"<nav class="pagination">"#));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = fixture();
    datagrid_cmd(dir.path())
        .args(["render", "--config"])
        .arg(dir.child("nope.yaml").path())
        .arg(dir.child("grid.yaml").path())
        .assert()
        .failure()
        .stderr(contains("config not found"));
}

#[test]
fn resolve_json_reports_candidates() {
    let dir = fixture();
    let theme = dir.child("theme.html.tera");
    theme
        .write_str("{% block grid_column_text_cell %}t{% endblock %}")
        .expect("write theme");

    let output = datagrid_cmd(dir.path())
        .args(["resolve", "--column", "created", "--json", "--theme"])
        .arg(theme.path())
        .arg(dir.child("grid.yaml").path())
        .output()
        .expect("run resolve");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["resolved"], "grid_column_text_cell");
    assert_eq!(json["instance_id"], "orders");
    assert_eq!(json["candidates"][0]["block"], "grid_orders_column_created_cell");
    assert_eq!(json["candidates"].as_array().map(Vec::len), Some(12));
}

#[test]
fn resolve_filter_without_override_reports_nothing() {
    let dir = fixture();
    datagrid_cmd(dir.path())
        .args(["resolve", "--column", "paid", "--category", "filter"])
        .arg(dir.child("grid.yaml").path())
        .assert()
        .success()
        .stdout(contains("grid_column_type_boolean_filter"))
        .stdout(contains("nothing"));
}

#[test]
fn resolve_unknown_column_fails() {
    let dir = fixture();
    datagrid_cmd(dir.path())
        .args(["resolve", "--column", "ghost"])
        .arg(dir.child("grid.yaml").path())
        .assert()
        .failure()
        .stderr(contains("has no column 'ghost'"));
}

#[test]
fn url_prints_section_urls() {
    let dir = fixture();
    datagrid_cmd(dir.path())
        .arg("url")
        .arg(dir.child("grid.yaml").path())
        .args(["order", "created"])
        .assert()
        .success()
        .stdout("/orders?g1[_order]=created|desc\n");

    datagrid_cmd(dir.path())
        .arg("url")
        .arg(dir.child("grid.yaml").path())
        .args(["page", "4"])
        .assert()
        .success()
        .stdout("/orders?g1[_page]=4\n");
}

#[test]
fn url_rejects_unknown_section() {
    let dir = fixture();
    datagrid_cmd(dir.path())
        .arg("url")
        .arg(dir.child("grid.yaml").path())
        .arg("sideways")
        .assert()
        .failure()
        .stderr(contains("unsupported grid url section 'sideways'"));
}

#[test]
fn blocks_lists_default_and_theme() {
    let dir = fixture();
    let theme = dir.child("theme.html.tera");
    theme
        .write_str("{% block grid_column_cell %}x{% endblock %}{% block grid_extra %}y{% endblock %}")
        .expect("write theme");

    datagrid_cmd(dir.path())
        .args(["blocks", "--theme"])
        .arg(theme.path())
        .assert()
        .success()
        .stdout(contains("@datagrid/blocks.html.tera (default)"))
        .stdout(contains("grid_column_operator"))
        .stdout(contains("grid_extra"));
}
