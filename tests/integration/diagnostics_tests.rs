//! Compile error integration tests
//!
//! Syntax errors from the parser and `javac` log markers are reported ahead
//! of deprecated usages, once per unit, line and message.

use searchdeprecated::config::Config;
use searchdeprecated::frontend::{
    CompositeDiagnostics, Diagnostics, JavaFrontEnd, JavacLog, SyntaxDiagnostics,
};
use searchdeprecated::report::Reporter;
use searchdeprecated::scan::Scanner;
use searchdeprecated::SourceUnit;
use std::fs;
use tempfile::TempDir;

fn run<D: Diagnostics>(units: &[SourceUnit], diagnostics: D, config: &Config) -> String {
    let mut scanner = Scanner::new(
        config,
        JavaFrontEnd::index(units),
        diagnostics,
        Reporter::new(Vec::new()),
    );
    scanner.scan_all(units, false).unwrap();
    String::from_utf8(scanner.into_reporter().into_inner()).unwrap()
}

#[test]
fn test_syntax_error_reported_with_type_name() {
    let units = vec![SourceUnit::with_contents(
        "src/p/Broken.java",
        "package p;\n\npublic class Broken {\n    void go() {\n        int x = ;\n    }\n}\n",
    )];

    let out = run(&units, SyntaxDiagnostics::new(), &Config::default());
    assert!(out.contains("(line 5)\n  -> ERROR: Syntax error"), "{}", out);
    assert!(!out.contains("(line 3)"), "{}", out);
}

#[test]
fn test_clean_unit_has_no_errors() {
    let units = vec![SourceUnit::with_contents(
        "src/p/Clean.java",
        "package p;\n\npublic class Clean {\n    int twice(int x) {\n        return x * 2;\n    }\n}\n",
    )];
    assert_eq!(run(&units, SyntaxDiagnostics::new(), &Config::default()), "");
}

#[test]
fn test_javac_log_markers_map_to_units() {
    let log = JavacLog::parse(
        r#"src/p/A.java:3: error: cannot find symbol
        Missing m;
        ^
  symbol:   class Missing
src/p/A.java:4: warning: [deprecation] getYear() in Date has been deprecated
src/q/Other.java:9: error: ';' expected
2 errors
1 warning
"#,
    );
    assert_eq!(log.len(), 3);

    let units = vec![SourceUnit::with_contents(
        "/work/app/src/p/A.java",
        "package p;\n\npublic class A {\n    Missing m;\n}\n",
    )];

    let out = run(&units, log, &Config::default());
    assert_eq!(out, "p.A  (line 3)\n  -> ERROR: cannot find symbol\n");
}

#[test]
fn test_errors_deduplicate_and_precede_findings() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("build.log");
    fs::write(
        &log_path,
        "p/B.java:5: error: incompatible types\np/B.java:5: error: incompatible types\n",
    )
    .unwrap();

    let units = vec![
        SourceUnit::with_contents(
            "src/p/B.java",
            "package p;\n\npublic class B {\n    @Deprecated\n    void old() {}\n}\n",
        ),
        SourceUnit::with_contents(
            "src/p/B.java",
            "package p;\n\npublic class B {\n    @Deprecated\n    void old() {}\n}\n",
        ),
    ];
    let diagnostics = CompositeDiagnostics::new().with(JavacLog::from_file(&log_path).unwrap());

    let out = run(&units, diagnostics, &Config::default());
    assert_eq!(
        out,
        "p.B  (line 5)\n  -> ERROR: incompatible types\nvoid p.B.old()  (line 4)\n  -> void p.B.old()\n"
    );
}

#[test]
fn test_errors_can_be_disabled() {
    let units = vec![SourceUnit::with_contents(
        "src/p/Broken.java",
        "package p;\n\npublic class Broken {\n    void go( {\n}\n",
    )];
    let mut config = Config::default();
    config.report.errors = false;

    let out = run(&units, SyntaxDiagnostics::new(), &config);
    assert!(!out.contains("ERROR"));
}

#[test]
fn test_unknown_primary_type_falls_back_to_file_name() {
    let units = vec![SourceUnit::with_contents("src/package-info.java", "package p;\n")];
    let log = JavacLog::parse("src/package-info.java:1: error: bad package annotation\n");

    let out = run(&units, log, &Config::default());
    assert_eq!(out, "package-info.java  (line 1)\n  -> ERROR: bad package annotation\n");
}
