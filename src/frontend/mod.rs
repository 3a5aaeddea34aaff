//! Java front-end built on tree-sitter.
//!
//! [`JavaFrontEnd::index`] runs the declaration pass over every unit of a
//! project; [`FrontEnd::parse`] then builds the resolved tree of one unit
//! against that index.

mod builder;
pub mod common;
pub mod diagnostics;
mod platform;
pub mod resolver;
pub mod symbols;

pub use builder::TreeBuilder;
pub use diagnostics::{
    CompositeDiagnostics, Diagnostics, DiagnosticsError, JavacLog, Marker, Severity,
    SyntaxDiagnostics,
};
pub use symbols::{SymbolCollector, SymbolTable};

use crate::discovery::SourceUnit;
use crate::syntax::SyntaxTree;
use rayon::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FrontEndError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tree-sitter rejected the Java grammar: {0}")]
    Language(String),

    #[error("failed to parse {path}")]
    Parse { path: PathBuf },
}

/// A unit parsed and resolved by a front-end
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub tree: SyntaxTree,
    /// Package declared by the unit, empty for the default package
    pub package: String,
}

/// Turns source units into resolved syntax trees
pub trait FrontEnd: Send + Sync {
    fn parse(&self, unit: &SourceUnit) -> Result<ParsedUnit, FrontEndError>;

    /// Fully qualified name of the unit's first top-level type
    fn primary_type_name(&self, unit: &SourceUnit) -> Option<String>;

    /// Declared package of the unit, if known
    fn package_of(&self, unit: &SourceUnit) -> Option<String>;
}

/// Tree-sitter Java front-end over a project-wide [`SymbolTable`]
#[derive(Debug)]
pub struct JavaFrontEnd {
    table: SymbolTable,
}

impl JavaFrontEnd {
    /// Collect the declarations of `units` in parallel. Units that cannot
    /// be read or parsed are skipped here and fail again in [`FrontEnd::parse`].
    pub fn index(units: &[SourceUnit]) -> Self {
        let collected: Vec<_> = units
            .par_iter()
            .filter_map(|unit| match Self::collect(unit) {
                Ok(collected) => Some((unit.path.clone(), collected)),
                Err(e) => {
                    warn!("Skipping declarations of {}: {}", unit.path.display(), e);
                    None
                }
            })
            .collect();

        let mut table = SymbolTable::new();
        for (path, unit) in collected {
            table.add_unit(&path, unit);
        }
        platform::install(&mut table);
        table.link();

        debug!("Indexed {} units, {} types", units.len(), table.len());
        Self { table }
    }

    fn collect(unit: &SourceUnit) -> Result<symbols::CollectedUnit, FrontEndError> {
        let source = read(unit)?;
        let tree = common::parse_java(&unit.path, &source)?;
        Ok(SymbolCollector::collect(tree.root_node(), &source))
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.table
    }
}

fn read(unit: &SourceUnit) -> Result<String, FrontEndError> {
    unit.read_contents().map_err(|source| FrontEndError::Io {
        path: unit.path.clone(),
        source,
    })
}

impl FrontEnd for JavaFrontEnd {
    fn parse(&self, unit: &SourceUnit) -> Result<ParsedUnit, FrontEndError> {
        let source = read(unit)?;
        let tree = common::parse_java(&unit.path, &source)?;
        let root = tree.root_node();

        let package = symbols::UnitContext::from_root(root, &source).package;
        let tree = TreeBuilder::build(&self.table, &unit.path, &source, root);
        Ok(ParsedUnit { tree, package })
    }

    fn primary_type_name(&self, unit: &SourceUnit) -> Option<String> {
        self.table.unit(&unit.path)?.primary_type.clone()
    }

    fn package_of(&self, unit: &SourceUnit) -> Option<String> {
        self.table.unit(&unit.path).map(|u| u.package.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::NodeKind;

    #[test]
    fn test_index_and_parse() {
        let units = vec![
            SourceUnit::with_contents(
                "src/p/Old.java",
                "package p;\n/** @deprecated */\npublic class Old { public void run() {} }\n",
            ),
            SourceUnit::with_contents(
                "src/q/User.java",
                "package q;\nimport p.Old;\nclass User extends Old {}\n",
            ),
        ];
        let frontend = JavaFrontEnd::index(&units);
        assert_eq!(frontend.primary_type_name(&units[0]).as_deref(), Some("p.Old"));
        assert_eq!(frontend.package_of(&units[1]).as_deref(), Some("q"));

        let parsed = frontend.parse(&units[1]).unwrap();
        assert_eq!(parsed.package, "q");
        let root = parsed.tree.node(parsed.tree.roots()[0]);
        match &root.kind {
            NodeKind::TypeDeclaration { superclass, .. } => {
                let superclass = superclass.as_ref().unwrap().binding.as_ref().unwrap();
                assert_eq!(superclass.identity(), "p.Old");
                assert!(superclass.deprecated);
                assert_eq!(superclass.modifiers.to_string(), "public");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_unit_fails_parse() {
        let unit = SourceUnit::new(PathBuf::from("/definitely/missing/A.java"));
        let frontend = JavaFrontEnd::index(std::slice::from_ref(&unit));
        assert!(matches!(frontend.parse(&unit), Err(FrontEndError::Io { .. })));
        assert_eq!(frontend.primary_type_name(&unit), None);
    }
}
