//! Compiler problem markers for source units.

use super::common::{node_text, parse_java};
use crate::discovery::SourceUnit;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A problem reported against a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub severity: Severity,
    /// 1-based line; `-1` when unknown
    pub line: i64,
    pub message: String,
}

impl Marker {
    pub fn error(line: i64, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse { path: PathBuf },
}

/// Source of problem markers for a unit
pub trait Diagnostics: Send + Sync {
    fn diagnostics(&self, unit: &SourceUnit) -> Result<Vec<Marker>, DiagnosticsError>;
}

/// Syntax errors found by the tree-sitter parser
#[derive(Debug, Default)]
pub struct SyntaxDiagnostics;

impl SyntaxDiagnostics {
    pub fn new() -> Self {
        Self
    }

    fn collect(node: Node, source: &str, markers: &mut Vec<Marker>) {
        let line = node.start_position().row as i64 + 1;
        if node.is_error() {
            let token = first_token(node, source);
            markers.push(Marker::error(
                line,
                format!("Syntax error on token \"{}\", delete this token", token),
            ));
            return;
        }
        if node.is_missing() {
            let construct = node
                .parent()
                .map(|p| camel_case(p.kind()))
                .unwrap_or_else(|| "CompilationUnit".to_string());
            markers.push(Marker::error(
                line,
                format!("Syntax error, insert \"{}\" to complete {}", node.kind(), construct),
            ));
            return;
        }
        if !node.has_error() {
            return;
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            Self::collect(child, source, markers);
        }
    }
}

impl Diagnostics for SyntaxDiagnostics {
    fn diagnostics(&self, unit: &SourceUnit) -> Result<Vec<Marker>, DiagnosticsError> {
        let source = unit.read_contents().map_err(|source| DiagnosticsError::Io {
            path: unit.path.clone(),
            source,
        })?;
        let tree = parse_java(&unit.path, &source).map_err(|_| DiagnosticsError::Parse {
            path: unit.path.clone(),
        })?;

        let mut markers = Vec::new();
        Self::collect(tree.root_node(), &source, &mut markers);
        Ok(markers)
    }
}

/// Text of the first leaf token under `node`
fn first_token<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    let mut current = node;
    while let Some(child) = current.child(0) {
        current = child;
    }
    let text = node_text(current, source).trim();
    if text.is_empty() {
        node_text(node, source).trim()
    } else {
        text
    }
}

/// `local_variable_declaration` -> `LocalVariableDeclaration`
fn camel_case(kind: &str) -> String {
    kind.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
struct LogEntry {
    path: PathBuf,
    marker: Marker,
}

/// Markers read from `javac` output
#[derive(Debug, Clone, Default)]
pub struct JavacLog {
    entries: Vec<LogEntry>,
}

static ENTRY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn entry_pattern() -> &'static Regex {
    ENTRY_PATTERN.get_or_init(|| {
        Regex::new(r"^(.+?\.java):(\d+): (error|warning): (.+)$").unwrap()
    })
}

/// Number of trailing components `unit` and `entry` share, when one path
/// ends with the whole of the other
fn suffix_match(unit: &Path, entry: &Path) -> Option<usize> {
    if unit.ends_with(entry) {
        Some(entry.components().count())
    } else if entry.ends_with(unit) {
        Some(unit.components().count())
    } else {
        None
    }
}

impl JavacLog {
    pub fn from_file(path: &Path) -> Result<Self, DiagnosticsError> {
        let text = std::fs::read_to_string(path).map_err(|source| DiagnosticsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse `<file>.java:<line>: error|warning: <message>` lines; source
    /// echo and caret lines are skipped.
    pub fn parse(text: &str) -> Self {
        let pattern = entry_pattern();
        let entries = text
            .lines()
            .filter_map(|line| {
                let caps = pattern.captures(line.trim_end())?;
                let line_number = caps[2].parse::<i64>().unwrap_or(-1);
                let severity = match &caps[3] {
                    "error" => Severity::Error,
                    _ => Severity::Warning,
                };
                let path: PathBuf = Path::new(&caps[1])
                    .components()
                    .filter(|c| *c != Component::CurDir)
                    .collect();
                Some(LogEntry {
                    path,
                    marker: Marker {
                        severity,
                        line: line_number,
                        message: caps[4].trim().to_string(),
                    },
                })
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Diagnostics for JavacLog {
    /// Entries whose path names the unit most specifically. A bare
    /// `Foo.java` entry only applies to a unit no longer entry matches.
    fn diagnostics(&self, unit: &SourceUnit) -> Result<Vec<Marker>, DiagnosticsError> {
        let matched: Vec<(usize, &LogEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| suffix_match(&unit.path, &entry.path).map(|n| (n, entry)))
            .collect();
        let best = matched.iter().map(|(n, _)| *n).max().unwrap_or(0);
        Ok(matched
            .into_iter()
            .filter(|(n, _)| *n == best)
            .map(|(_, entry)| entry.marker.clone())
            .collect())
    }
}

/// Concatenates the markers of several services, in order
#[derive(Default)]
pub struct CompositeDiagnostics {
    services: Vec<Box<dyn Diagnostics>>,
}

impl CompositeDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, service: impl Diagnostics + 'static) -> Self {
        self.services.push(Box::new(service));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Diagnostics for CompositeDiagnostics {
    fn diagnostics(&self, unit: &SourceUnit) -> Result<Vec<Marker>, DiagnosticsError> {
        let mut markers = Vec::new();
        for service in &self.services {
            markers.extend(service.diagnostics(unit)?);
        }
        Ok(markers)
    }
}
