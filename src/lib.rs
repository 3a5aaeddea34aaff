//! SearchDeprecated - Deprecated API usage scanner for Java workspaces
//!
//! Reports every place where Java source code declares or references a
//! program element marked deprecated, together with the compile errors of
//! each unit.
//!
//! # Architecture
//!
//! The scan pipeline consists of:
//! 1. **Workspace Discovery** - Find projects, source roots and `.java` units
//! 2. **Indexing** - Collect declared types and members with tree-sitter
//! 3. **Resolution** - Build a resolved syntax tree per unit
//! 4. **Diagnostics** - Gather compile error markers per unit
//! 5. **Detection** - Walk the tree for deprecated bindings
//! 6. **Reporting** - Write deduplicated caller/callee pairs

pub mod config;
pub mod deprecation;
pub mod discovery;
pub mod frontend;
pub mod model;
pub mod report;
pub mod scan;
pub mod syntax;

pub use config::Config;
pub use deprecation::{find_deprecated_usages, Finding, Usage};
pub use discovery::{FileFinder, Project, SourceUnit, Workspace};
pub use frontend::{CompositeDiagnostics, FrontEnd, JavaFrontEnd, JavacLog, SyntaxDiagnostics};
pub use report::{ErrorEntry, ReportStats, Reporter};
pub use scan::{Scanner, UnitReport};
