//! Integration tests for the dashctl binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn dashctl() -> Command {
    let mut cmd = Command::cargo_bin("dashctl").unwrap();
    cmd.env_remove("DASHCTL_FORMAT").env_remove("DASHCTL_CONFIG");
    cmd
}

fn write_json(dir: &TempDir, name: &str, value: &Value) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    path
}

fn tables() -> Value {
    json!([
        {
            "data_table_id": "T1",
            "name": "Cost",
            "data_type": "ADDED",
            "options": {"source": {"UNIFIED_COST": {"data_key": "cost"}}, "group_by": ["Region"]}
        },
        {
            "data_table_id": "T2",
            "name": "Usage",
            "data_type": "ADDED",
            "options": {"source": {"UNIFIED_COST": {"data_key": "usage"}}}
        },
        {
            "data_table_id": "T3",
            "name": "Cost and usage",
            "data_type": "TRANSFORMED",
            "options": {"JOIN": {"data_tables": ["T1", "T2"]}}
        }
    ])
}

#[test]
fn widgets_list_table() {
    dashctl()
        .args(["widgets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lineChart"))
        .stdout(predicate::str::contains("sankeyChart"))
        .stdout(predicate::str::contains("Total: 14 widget(s)"));
}

#[test]
fn widgets_show_json() {
    let output = dashctl()
        .args(["--format", "json", "widgets", "show", "gauge"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let detail: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(detail["name"], "gauge");
    assert_eq!(detail["fields"][0]["key"], "dataField");
    assert_eq!(detail["fields"][0]["required"], true);
}

#[test]
fn widgets_show_unknown_fails() {
    dashctl()
        .args(["widgets", "show", "radar"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown widget: radar"));
}

#[test]
fn format_from_env() {
    dashctl()
        .env("DASHCTL_FORMAT", "json")
        .args(["widgets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn validate_save_ready_values() {
    let dir = TempDir::new().unwrap();
    let values = write_json(
        &dir,
        "values.json",
        &json!({
            "granularity": {"granularity": "MONTHLY"},
            "xAxis": {"data": ["Region"]},
            "tableDataField": {"data": ["cost"], "version": "v1"}
        }),
    );

    dashctl()
        .args(["validate", "--widget", "lineChart", "--values"])
        .arg(&values)
        .assert()
        .success()
        .stdout(predicate::str::contains("Save ready:  yes"));
}

#[test]
fn validate_missing_required_exits_2() {
    let dir = TempDir::new().unwrap();
    let values = write_json(&dir, "values.json", &json!({"xAxis": {"data": ["Region"]}}));

    let output = dashctl()
        .args(["--format", "json", "validate", "--widget", "lineChart", "--values"])
        .arg(&values)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["save_ready"], false);
    let keys: Vec<&str> = report["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["key"].as_str())
        .collect();
    assert_eq!(keys, vec!["granularity", "tableDataField"]);
}

#[test]
fn validate_with_config_reports_unknown_keys() {
    let dir = TempDir::new().unwrap();
    let config = write_json(&dir, "dashctl.json", &json!({"reportUnknownKeys": true}));
    let values = write_json(
        &dir,
        "values.json",
        &json!({"dataField": {"data": "cost"}, "sparkline": {"data": "cost"}}),
    );

    dashctl()
        .env("DASHCTL_CONFIG", &config)
        .args(["validate", "--widget", "numberCard", "--values"])
        .arg(&values)
        .assert()
        .success()
        .stdout(predicate::str::contains("sparkline"));
}

#[test]
fn validate_malformed_values_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("values.json");
    fs::write(&path, "{not json").unwrap();

    dashctl()
        .args(["validate", "--widget", "lineChart", "--values"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("parsing"));
}

#[test]
fn migrate_legacy_line_chart() {
    let dir = TempDir::new().unwrap();
    let options = write_json(
        &dir,
        "legacy.json",
        &json!({
            "granularity": {"value": "DAILY"},
            "xAxis": {"value": {"data": "Region", "count": 10}},
            "dataField": {"value": {"data": ["cost"]}},
            "lineBy": {"value": {"data": "Provider", "count": 3}}
        }),
    );

    let output = dashctl()
        .args(["--format", "json", "migrate", "--widget", "lineChart", "--options"])
        .arg(&options)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let table_data_field = &report["values"]["tableDataField"];
    assert_eq!(table_data_field["version"], "v1");
    assert_eq!(table_data_field["fieldType"], "dynamicField");
    assert_eq!(table_data_field["data"], "Provider");
    assert_eq!(table_data_field["criteria"], "cost");
    assert_eq!(table_data_field["count"], 3);
    assert!(report["values"].get("dataField").is_none());
}

#[test]
fn tables_resolve_join() {
    let dir = TempDir::new().unwrap();
    let path = write_json(&dir, "tables.json", &tables());

    dashctl()
        .args(["tables", "resolve", "--tables"])
        .arg(&path)
        .arg("T3")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. load T1"))
        .stdout(predicate::str::contains("3. join T1+T2"))
        .stdout(predicate::str::contains("Roots: T1, T2"));
}

#[test]
fn tables_order_json() {
    let dir = TempDir::new().unwrap();
    let path = write_json(&dir, "tables.json", &tables());

    let output = dashctl()
        .args(["--format", "json", "tables", "order", "--tables"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());
    let order: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(order["order"], json!(["T1", "T2", "T3"]));
}

#[test]
fn tables_check_activates_every_table() {
    let dir = TempDir::new().unwrap();
    let path = write_json(&dir, "tables.json", &tables());

    dashctl()
        .args(["tables", "check", "--tables"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ACTIVE"))
        .stdout(predicate::str::contains("Total: 3 table(s), 0 failed"));
}

#[test]
fn tables_check_rejects_cycle() {
    let dir = TempDir::new().unwrap();
    let path = write_json(
        &dir,
        "tables.json",
        &json!([
            {
                "data_table_id": "T1",
                "name": "Cost",
                "data_type": "ADDED",
                "options": {"source": {"UNIFIED_COST": {"data_key": "cost"}}}
            },
            {
                "data_table_id": "T2",
                "name": "A",
                "data_type": "TRANSFORMED",
                "options": {"JOIN": {"data_tables": ["T1", "T3"]}}
            },
            {
                "data_table_id": "T3",
                "name": "B",
                "data_type": "TRANSFORMED",
                "options": {"JOIN": {"data_tables": ["T1", "T2"]}}
            }
        ]),
    );

    dashctl()
        .args(["tables", "check", "--tables"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cycle"));
}
