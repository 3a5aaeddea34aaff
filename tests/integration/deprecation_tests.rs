//! Deprecated-usage integration tests
//!
//! These tests run the full front-end and scanner over in-memory units and
//! compare the exact report text.

use searchdeprecated::config::Config;
use searchdeprecated::frontend::{CompositeDiagnostics, JavaFrontEnd};
use searchdeprecated::report::Reporter;
use searchdeprecated::scan::Scanner;
use searchdeprecated::SourceUnit;

fn units(sources: &[(&str, &str)]) -> Vec<SourceUnit> {
    sources
        .iter()
        .map(|(path, contents)| SourceUnit::with_contents(*path, *contents))
        .collect()
}

/// Scan the units at `targets` against an index of all `units`
fn scan(units: &[SourceUnit], targets: &[usize], parallel: bool) -> String {
    let mut scanner = Scanner::new(
        &Config::default(),
        JavaFrontEnd::index(units),
        CompositeDiagnostics::new(),
        Reporter::new(Vec::new()),
    );
    let selected: Vec<SourceUnit> = targets.iter().map(|&i| units[i].clone()).collect();
    scanner.scan_all(&selected, parallel).unwrap();
    String::from_utf8(scanner.into_reporter().into_inner()).unwrap()
}

// ============================================================================
// Reference Scenarios
// ============================================================================

#[test]
fn test_deprecated_static_call() {
    let units = units(&[
        (
            "src/p/Util.java",
            "package p;\n\npublic class Util {\n    @Deprecated\n    public static String helper(int n) {\n        return \"\";\n    }\n}\n",
        ),
        (
            "src/p/Owner.java",
            r#"package p;

public class Owner {
    private int count;

    public Owner() {
        count = 0;
    }

    public void run() {
        count++;
        Util.helper(42);
    }
}
"#,
        ),
    ]);

    assert_eq!(
        scan(&units, &[1], false),
        "public void p.Owner.run()  (line 12)\n  -> public static java.lang.String p.Util.helper(\n    int\n)\n"
    );
}

#[test]
fn test_deprecated_superclass() {
    let units = units(&[
        (
            "src/p/DeprecatedBase.java",
            "package p;\n\n@Deprecated\nclass DeprecatedBase {\n}\n",
        ),
        ("src/p/Foo.java", "package p;\n\nclass Foo extends DeprecatedBase {\n}\n"),
    ]);

    assert_eq!(
        scan(&units, &[1], false),
        " class p.Foo  (line 3)\n  -> class p.DeprecatedBase\n"
    );
}

#[test]
fn test_repeated_field_type_reported_once() {
    let units = units(&[
        (
            "src/p/Legacy.java",
            "package p;\n\n/**\n * @deprecated use Modern instead\n */\npublic class Legacy {\n}\n",
        ),
        (
            "src/p/Holder.java",
            "package p;\n\npublic class Holder {\n    private Legacy first;\n    protected Legacy second;\n}\n",
        ),
    ]);

    assert_eq!(
        scan(&units, &[1], false),
        "public class p.Holder  (line 4)\n  -> public class p.Legacy\n"
    );
}

#[test]
fn test_enum_field_reports_enum_as_caller() {
    let units = units(&[
        (
            "src/p/Base.java",
            "package p;\n\npublic class Base {\n    @Deprecated\n    public static class Gone {\n    }\n}\n",
        ),
        (
            "src/p/E.java",
            "package p;\n\npublic enum E {\n    A;\n\n    private Base.Gone gone;\n}\n",
        ),
    ]);

    assert_eq!(
        scan(&units, &[1], false),
        "public final enum p.E  (line 6)\n  -> public static class p.Base$Gone\n"
    );
}

#[test]
fn test_super_invocation_not_reported() {
    let units = units(&[
        (
            "src/p/Parent.java",
            "package p;\n\npublic class Parent {\n    @Deprecated\n    public void old() {}\n}\n",
        ),
        (
            "src/p/Child.java",
            "package p;\n\npublic class Child extends Parent {\n    public void run() {\n        super.old();\n    }\n}\n",
        ),
    ]);

    assert_eq!(scan(&units, &[1], false), "");
}

#[test]
fn test_unresolvable_calls_are_silent() {
    let units = units(&[(
        "src/p/Caller.java",
        r#"package p;

public class Caller {
    void go() {
        missing.thing();
        Unknown.call(1);
        new Object().nothing();
        this.absent(2, 3);
    }
}
"#,
    )]);

    assert_eq!(scan(&units, &[0], false), "");
}

// ============================================================================
// Declarations and Platform APIs
// ============================================================================

#[test]
fn test_deprecated_declarations_report_themselves() {
    let units = units(&[(
        "src/p/Old.java",
        "package p;\n\n@Deprecated\npublic class Old {\n    @Deprecated\n    void gone() {}\n}\n",
    )]);

    assert_eq!(
        scan(&units, &[0], false),
        "public class p.Old  (line 3)\n  -> class p.Old\nvoid p.Old.gone()  (line 5)\n  -> void p.Old.gone()\n"
    );
}

#[test]
fn test_platform_deprecations() {
    let units = units(&[(
        "src/p/Clock.java",
        r#"package p;

import java.util.Date;

public class Clock {
    public int year(Date date) {
        return date.getYear();
    }

    public void halt() {
        Thread.currentThread().stop();
    }
}
"#,
    )]);

    assert_eq!(
        scan(&units, &[0], false),
        concat!(
            "public int p.Clock.year(\n    java.util.Date\n)  (line 7)\n",
            "  -> public int java.util.Date.getYear()\n",
            "public void p.Clock.halt()  (line 11)\n",
            "  -> public final void java.lang.Thread.stop()\n",
        )
    );
}

#[test]
fn test_deprecated_constructor_and_type() {
    let units = units(&[
        (
            "src/p/Widget.java",
            "package p;\n\n@Deprecated\npublic class Widget {\n    @Deprecated\n    public Widget(String name, int size) {}\n}\n",
        ),
        (
            "src/p/Factory.java",
            "package p;\n\npublic class Factory {\n    Object make() {\n        return new Widget(\"a\", 1);\n    }\n}\n",
        ),
    ]);

    assert_eq!(
        scan(&units, &[1], false),
        concat!(
            "java.lang.Object p.Factory.make()  (line 5)\n",
            "  -> class p.Widget\n",
            "java.lang.Object p.Factory.make()  (line 5)\n",
            "  -> public void p.Widget.Widget(\n    java.lang.String,\n    int\n)\n",
        )
    );
}

// ============================================================================
// Run-wide Behavior
// ============================================================================

#[test]
fn test_dedup_spans_units() {
    let units = units(&[
        (
            "src/p/Api.java",
            "package p;\n\npublic class Api {\n    @Deprecated\n    public static void old() {}\n}\n",
        ),
        (
            "src/p/Twice.java",
            "package p;\n\npublic class Twice {\n    void a() {\n        Api.old();\n        Api.old();\n    }\n}\n",
        ),
    ]);

    let out = scan(&units, &[1, 1], false);
    assert_eq!(out.matches("-> public static void p.Api.old()").count(), 1);
    assert!(out.contains("(line 5)"));
}

#[test]
fn test_parallel_matches_sequential() {
    let mut sources = vec![(
        "src/p/Api.java".to_string(),
        "package p;\n\npublic class Api {\n    @Deprecated\n    public static void old() {}\n    @Deprecated\n    public static void older(int x) {}\n}\n"
            .to_string(),
    )];
    for i in 0..24 {
        sources.push((
            format!("src/p/User{}.java", i),
            format!(
                "package p;\n\npublic class User{} {{\n    void go() {{\n        Api.old();\n        Api.older({});\n    }}\n}}\n",
                i, i
            ),
        ));
    }
    let units: Vec<SourceUnit> = sources
        .iter()
        .map(|(path, contents)| SourceUnit::with_contents(path.as_str(), contents.as_str()))
        .collect();
    let targets: Vec<usize> = (0..units.len()).collect();

    let sequential = scan(&units, &targets, false);
    let parallel = scan(&units, &targets, true);
    assert!(!sequential.is_empty());
    assert_eq!(sequential, parallel);
}
