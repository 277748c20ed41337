//! CLI report/summary integration tests
//!
//! These tests run the `confdiff` binary against bundle files written to a
//! temporary directory.

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn side(rows: serde_json::Value) -> serde_json::Value {
    json!({
        "tables": [{
            "name": "connectors",
            "columns": [
                {"name": "Id", "type": "text"},
                {"name": "Name", "type": "text"},
                {"name": "Precedence", "type": "integer"}
            ],
            "primary_key": ["Id"],
            "rows": rows
        }]
    })
}

fn write_bundle(dir: &Path, pilot: serde_json::Value, production: serde_json::Value) -> PathBuf {
    let bundle = json!({
        "sections": [{
            "name": "connectors",
            "title": "Connectors",
            "pilot": side(pilot),
            "production": side(production)
        }]
    });
    let path = dir.join("bundle.json");
    fs::write(&path, bundle.to_string()).unwrap();
    path
}

fn confdiff(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_confdiff"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_cli_report_writes_body_and_toc() {
    // Scenario: one added and one modified connector
    // When: `confdiff report bundle.json --out-dir out --mode always-show`
    // Then: report.html and toc.html exist and carry the status classes

    let temp_dir = TempDir::new().unwrap();
    let bundle = write_bundle(
        temp_dir.path(),
        json!([["{AAA-1}", "AD", 1], ["{BBB-2}", "HR", 2]]),
        json!([["{AAA-1}", "AD", 5]]),
    );

    let output = confdiff(
        temp_dir.path(),
        &[
            "report",
            bundle.to_str().unwrap(),
            "--out-dir",
            "out",
            "--mode",
            "always-show",
        ],
    );
    assert!(
        output.status.success(),
        "CLI command should succeed. Stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Report written:"));
    assert!(stdout.contains("rows: +1 -0 ~1 =0"));

    let body = fs::read_to_string(temp_dir.path().join("out/report.html")).unwrap();
    assert!(body.contains("<h2>Connectors</h2>"));
    assert!(body.contains("class=\"added\""));
    assert!(body.contains("<del class=\"old-value\">5</del> <ins class=\"new-value\">1</ins>"));
    assert!(temp_dir.path().join("out/toc.html").exists());
}

#[test]
fn test_cli_report_honours_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let bundle = write_bundle(temp_dir.path(), json!([["{AAA-1}", "AD", 1]]), json!([]));
    fs::write(
        temp_dir.path().join("report.toml"),
        "title = \"Sync Changes\"\nbody_file = \"changes.html\"\ntoc_file = \"contents.html\"\n",
    )
    .unwrap();

    let output = confdiff(
        temp_dir.path(),
        &["report", bundle.to_str().unwrap(), "--config", "report.toml"],
    );
    assert!(output.status.success());

    let body = fs::read_to_string(temp_dir.path().join("changes.html")).unwrap();
    assert!(body.contains("<title>Sync Changes</title>"));
    let toc = fs::read_to_string(temp_dir.path().join("contents.html")).unwrap();
    assert!(toc.contains("href=\"changes.html#section-connectors\""));
}

#[test]
fn test_cli_report_shape_mismatch_writes_nothing() {
    // Scenario: production declares a different column type
    // Then: the command fails and no report files are left behind

    let temp_dir = TempDir::new().unwrap();
    let mut production = side(json!([]));
    production["tables"][0]["columns"][2]["type"] = json!("text");
    let bundle = json!({
        "sections": [{
            "name": "connectors",
            "title": "Connectors",
            "pilot": side(json!([])),
            "production": production
        }]
    });
    let path = temp_dir.path().join("bundle.json");
    fs::write(&path, bundle.to_string()).unwrap();

    let output = confdiff(
        temp_dir.path(),
        &["report", path.to_str().unwrap(), "--out-dir", "out"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERR_SHAPE_MISMATCH"), "stderr: {}", stderr);

    let leftovers = fs::read_dir(temp_dir.path().join("out"))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
}

#[test]
fn test_cli_summary_prints_markdown() {
    let temp_dir = TempDir::new().unwrap();
    let bundle = write_bundle(
        temp_dir.path(),
        json!([["{AAA-1}", "AD", 1]]),
        json!([["{AAA-1}", "AD", 1], ["{CCC-3}", "Legacy", 9]]),
    );

    let output = confdiff(temp_dir.path(), &["summary", bundle.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## Connectors"));
    assert!(stdout.contains("- **Deleted** `{CCC-3}`"));
}

#[test]
fn test_cli_missing_bundle_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = confdiff(temp_dir.path(), &["summary", "nope.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}
