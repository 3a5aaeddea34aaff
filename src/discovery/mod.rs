mod file_finder;
mod workspace;

pub use file_finder::{is_java_file, FileFinder, SourceUnit};
pub use workspace::{Project, Workspace, WorkspaceError, HEADER_RULE};
