//! Workspace integration tests
//!
//! Projects are laid out on disk with tempfile and scanned through the
//! same steps the binary takes.

use searchdeprecated::config::Config;
use searchdeprecated::discovery::Workspace;
use searchdeprecated::frontend::{CompositeDiagnostics, JavaFrontEnd};
use searchdeprecated::report::Reporter;
use searchdeprecated::scan::Scanner;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A Maven project `app` with a deprecated method used across its source
/// roots, and a Gradle project `lib` with a javadoc-deprecated method.
fn maven_workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(&root.join("app/pom.xml"), "<project/>");
    write(
        &root.join("app/src/main/java/com/acme/Service.java"),
        "package com.acme;\n\npublic class Service {\n    @Deprecated\n    public void legacy() {}\n\n    public void call() {\n        legacy();\n    }\n}\n",
    );
    write(
        &root.join("app/src/test/java/com/acme/ServiceTest.java"),
        "package com.acme;\n\npublic class ServiceTest {\n    void test() {\n        new Service().legacy();\n    }\n}\n",
    );
    write(
        &root.join("app/target/generated/com/acme/Gen.java"),
        "package com.acme;\n\n@Deprecated\npublic class Gen {}\n",
    );

    write(&root.join("lib/build.gradle"), "");
    write(
        &root.join("lib/src/main/java/org/util/Strings.java"),
        "package org.util;\n\npublic final class Strings {\n    /** @deprecated */\n    public static String pad(String s, int n) {\n        return s;\n    }\n}\n",
    );

    temp
}

fn scan_workspace(root: &Path, config: &Config) -> String {
    let workspace = Workspace::open(root, config).unwrap();
    let mut reporter = Reporter::new(Vec::new());
    for line in workspace.header_lines() {
        reporter.write_line(&line).unwrap();
    }

    let mut scanner = Scanner::new(
        config,
        JavaFrontEnd::index(&[]),
        CompositeDiagnostics::new(),
        reporter,
    );
    for project in &workspace.projects {
        scanner.write_line(&project.header()).unwrap();
        let units = project.units(config);
        scanner.set_front_end(JavaFrontEnd::index(&units));
        scanner.scan_all(&units, config.scan.parallel).unwrap();
    }
    String::from_utf8(scanner.into_reporter().into_inner()).unwrap()
}

#[test]
fn test_full_workspace_report() {
    let temp = maven_workspace();
    let out = scan_workspace(temp.path(), &Config::default());

    let expected = format!(
        concat!(
            "Workspace: {}\n",
            "===================================\n",
            "\n[Project] app\n",
            "public void com.acme.Service.legacy()  (line 4)\n",
            "  -> public void com.acme.Service.legacy()\n",
            "public void com.acme.Service.call()  (line 8)\n",
            "  -> public void com.acme.Service.legacy()\n",
            "void com.acme.ServiceTest.test()  (line 5)\n",
            "  -> public void com.acme.Service.legacy()\n",
            "\n[Project] lib\n",
            "public static java.lang.String org.util.Strings.pad(\n    java.lang.String,\n    int\n)  (line 4)\n",
            "  -> public static java.lang.String org.util.Strings.pad(\n    java.lang.String,\n    int\n)\n",
        ),
        temp.path().display()
    );
    assert_eq!(out, expected);
}

#[test]
fn test_project_and_package_filters() {
    let temp = maven_workspace();

    let config = Config {
        projects: vec!["lib".to_string()],
        ..Config::default()
    };
    let out = scan_workspace(temp.path(), &config);
    assert!(!out.contains("[Project] app"));
    assert!(out.contains("org.util.Strings.pad"));

    let config = Config {
        packages: vec!["com.acme".to_string()],
        ..Config::default()
    };
    let out = scan_workspace(temp.path(), &config);
    assert!(out.contains("[Project] lib"));
    assert!(out.contains("com.acme.Service.legacy"));
    assert!(!out.contains("org.util.Strings.pad"));
}

#[test]
fn test_custom_targets_and_exclusions() {
    let temp = maven_workspace();
    let config = Config {
        targets: vec!["target".into()],
        exclude: vec![],
        ..Config::default()
    };
    let out = scan_workspace(temp.path(), &config);
    assert!(out.contains("public class com.acme.Gen  (line 3)\n  -> class com.acme.Gen\n"));

    let config = Config {
        targets: vec!["target".into()],
        exclude: vec!["**/generated/**".to_string()],
        ..Config::default()
    };
    let out = scan_workspace(temp.path(), &config);
    assert!(!out.contains("com.acme.Gen"));
}

#[test]
fn test_config_files_drive_the_scan() {
    let temp = maven_workspace();
    write(
        &temp.path().join("deprecated.yml"),
        "projects:\n  - app\nscan:\n  parallel: true\n",
    );
    let config = Config::from_default_locations(temp.path()).unwrap();
    assert!(config.scan.parallel);
    let parallel = scan_workspace(temp.path(), &config);

    let toml_path = temp.path().join("settings.toml");
    write(&toml_path, "projects = [\"app\"]\n\n[scan]\nparallel = false\n");
    let config = Config::from_file(&toml_path).unwrap();
    assert!(!config.scan.parallel);
    let sequential = scan_workspace(temp.path(), &config);

    assert_eq!(parallel, sequential);
    assert!(!sequential.contains("[Project] lib"));
}
