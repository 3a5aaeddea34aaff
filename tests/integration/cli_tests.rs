//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn searchdeprecated() -> Command {
    Command::cargo_bin("searchdeprecated").unwrap()
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A single implicit project with one deprecated call
fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(
        &temp.path().join("src/p/Api.java"),
        "package p;\n\npublic class Api {\n    /** @deprecated */\n    public static int old(int a, int b) {\n        return a + b;\n    }\n}\n",
    );
    write(
        &temp.path().join("src/q/Client.java"),
        "package q;\n\nimport p.Api;\n\npublic class Client {\n    int go() {\n        return Api.old(1, 2);\n    }\n}\n",
    );
    temp
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    searchdeprecated()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("searchdeprecated"))
        .stdout(predicate::str::contains("--parallel"))
        .stdout(predicate::str::contains("--javac-log"));
}

#[test]
fn test_cli_version() {
    searchdeprecated()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("searchdeprecated"));
}

#[test]
fn test_cli_missing_path_fails() {
    let temp = TempDir::new().unwrap();
    searchdeprecated()
        .arg(temp.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open workspace"));
}

// ============================================================================
// Scanning
// ============================================================================

#[test]
fn test_cli_reports_deprecated_call() {
    let temp = workspace();
    let project = temp.path().file_name().unwrap().to_string_lossy().to_string();

    let expected = format!(
        concat!(
            "Workspace: {}\n",
            "===================================\n",
            "\n[Project] {}\n",
            "public static int p.Api.old(\n    int,\n    int\n)  (line 4)\n",
            "  -> public static int p.Api.old(\n    int,\n    int\n)\n",
            "int q.Client.go()  (line 7)\n",
            "  -> public static int p.Api.old(\n    int,\n    int\n)\n",
        ),
        temp.path().display(),
        project
    );

    searchdeprecated()
        .arg(temp.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::diff(expected));
}

#[test]
fn test_cli_no_header_and_package_filter() {
    let temp = workspace();
    searchdeprecated()
        .arg(temp.path())
        .args(["--no-header", "--package", "q", "-q"])
        .assert()
        .success()
        .stdout("int q.Client.go()  (line 7)\n  -> public static int p.Api.old(\n    int,\n    int\n)\n");
}

#[test]
fn test_cli_parallel_output_file() {
    let temp = workspace();
    let out_dir = TempDir::new().unwrap();
    let report = out_dir.path().join("report.txt");

    searchdeprecated()
        .arg(temp.path())
        .arg("--parallel")
        .arg("--no-header")
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("2 deprecated usages"));

    let contents = fs::read_to_string(&report).unwrap();
    assert!(contents.contains("int q.Client.go()  (line 7)"));
}

#[test]
fn test_cli_javac_log_and_no_deprecations() {
    let temp = workspace();
    let log = temp.path().join("javac.log");
    fs::write(&log, "src/q/Client.java:7: error: incompatible types\n").unwrap();

    searchdeprecated()
        .arg(temp.path())
        .arg("--javac-log")
        .arg(&log)
        .args(["--no-deprecations", "--no-header", "-q"])
        .assert()
        .success()
        .stdout("q.Client  (line 7)\n  -> ERROR: incompatible types\n");
}

#[test]
fn test_cli_config_file() {
    let temp = workspace();
    let config = temp.path().join("scan.toml");
    fs::write(&config, "packages = [\"p\"]\n\n[report]\nheader = false\n").unwrap();

    searchdeprecated()
        .arg(temp.path())
        .arg("--config")
        .arg(&config)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("public static int p.Api.old("))
        .stdout(predicate::str::contains("q.Client").not());
}
