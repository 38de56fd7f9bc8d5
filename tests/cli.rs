mod common;

use std::fs;

use assert_cmd::Command;
use predicates::str::contains;

use common::TestWorkspace;

const WASTING_BUNDLE: &str = r#"{
    "3512": {
        "data": { "entities": [99, 45, 204], "values": [5.5, 4.2, 12.6], "years": [1983, 1985, 1985] },
        "metadata": {
            "id": 3512,
            "name": "Prevalence of wasting, weight for height (% of children under 5)",
            "unit": "% of children under 5",
            "shortUnit": "%",
            "display": { "name": "Some Display Name" },
            "dimensions": {
                "entities": { "values": [
                    { "id": 45, "name": "Cape Verde", "code": "CPV" },
                    { "id": 99, "name": "Papua New Guinea", "code": "PNG" },
                    { "id": 204, "name": "Kiribati", "code": "KIR" }
                ] },
                "years": { "values": [{ "id": 1983 }, { "id": 1985 }] }
            }
        }
    }
}"#;

const WASTING_CONFIG: &str = r#"{
    "type": "LineChart",
    "dimensions": [{ "variableId": 3512, "property": "y" }],
    "selectedData": [{ "entityId": 45, "index": 0, "color": "blue" }]
}"#;

fn write_fixtures(workspace: &TestWorkspace) -> (std::path::PathBuf, std::path::PathBuf) {
    let bundle = workspace.write("bundle.json", WASTING_BUNDLE);
    let config = workspace.write("config.json", WASTING_CONFIG);
    (bundle, config)
}

#[test]
fn csv_prints_the_sorted_export_to_stdout() {
    let workspace = TestWorkspace::new();
    let (bundle, config) = write_fixtures(&workspace);
    Command::cargo_bin("chart-table")
        .expect("binary exists")
        .args([
            "csv",
            "-b",
            bundle.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains(
            "Entity,Code,Year,\"Prevalence of wasting, weight for height (% of children under 5)\"",
        ))
        .stdout(contains("Cape Verde,CPV,1985,4.2"))
        .stdout(contains("Papua New Guinea,PNG,1983,5.5"));
}

#[test]
fn csv_writes_the_export_to_a_file() {
    let workspace = TestWorkspace::new();
    let (bundle, config) = write_fixtures(&workspace);
    let out_path = workspace.path().join("export.csv");
    Command::cargo_bin("chart-table")
        .expect("binary exists")
        .args([
            "csv",
            "-b",
            bundle.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let written = fs::read_to_string(&out_path).expect("read exported csv");
    let expected = "Entity,Code,Year,\"Prevalence of wasting, weight for height (% of children under 5)\"\n\
        Cape Verde,CPV,1985,4.2\n\
        Kiribati,KIR,1985,12.6\n\
        Papua New Guinea,PNG,1983,5.5\n";
    assert_eq!(written, expected);
}

#[test]
fn columns_lists_every_joined_column() {
    let workspace = TestWorkspace::new();
    let (bundle, config) = write_fixtures(&workspace);
    Command::cargo_bin("chart-table")
        .expect("binary exists")
        .args([
            "columns",
            "-b",
            bundle.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(contains("entityName"))
        .stdout(contains("3512"))
        .stdout(contains("Some Display Name"));
}

#[test]
fn preview_renders_entity_rows() {
    let workspace = TestWorkspace::new();
    let (bundle, config) = write_fixtures(&workspace);
    Command::cargo_bin("chart-table")
        .expect("binary exists")
        .args([
            "preview",
            "-b",
            bundle.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
            "--rows",
            "2",
        ])
        .assert()
        .success()
        .stdout(contains("Papua New Guinea"))
        .stdout(contains("Cape Verde"));
}

#[test]
fn unknown_variable_in_the_config_fails_with_a_clear_error() {
    let workspace = TestWorkspace::new();
    let bundle = workspace.write("bundle.json", WASTING_BUNDLE);
    let config = workspace.write(
        "config.json",
        r#"{ "dimensions": [{ "variableId": 99, "property": "y" }] }"#,
    );
    Command::cargo_bin("chart-table")
        .expect("binary exists")
        .args([
            "csv",
            "-b",
            bundle.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("unknown variable 99"));
}

#[test]
fn day_variable_without_zero_day_fails_with_a_clear_error() {
    let workspace = TestWorkspace::new();
    let bundle = workspace.write(
        "bundle.json",
        r#"{
            "7": {
                "data": { "entities": [1], "values": [8.0], "years": [0] },
                "metadata": {
                    "id": 7,
                    "display": { "yearIsDay": true },
                    "dimensions": {
                        "entities": { "values": [{ "id": 1, "name": "World", "code": "OWID_WRL" }] },
                        "years": { "values": [{ "id": 0 }] }
                    }
                }
            }
        }"#,
    );
    let config = workspace.write(
        "config.json",
        r#"{ "dimensions": [{ "variableId": 7, "property": "y" }] }"#,
    );
    Command::cargo_bin("chart-table")
        .expect("binary exists")
        .args([
            "csv",
            "-b",
            bundle.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("zeroDay"));
}

#[test]
fn missing_bundle_file_reports_the_path() {
    let workspace = TestWorkspace::new();
    let config = workspace.write("config.json", WASTING_CONFIG);
    Command::cargo_bin("chart-table")
        .expect("binary exists")
        .args([
            "csv",
            "-b",
            workspace.path().join("absent.json").to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(contains("absent.json"));
}
