//! Projects and source roots of a workspace directory.

use super::{FileFinder, SourceUnit};
use crate::config::Config;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Separator printed under the workspace line
pub const HEADER_RULE: &str = "===================================";

const PROJECT_MARKERS: &[&str] = &[".project", "pom.xml", "build.gradle", "build.gradle.kts"];

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace root not found: {path}")]
    NotFound { path: PathBuf },

    #[error("workspace root is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed {path}: {message}")]
    Classpath { path: PathBuf, message: String },
}

/// A Java project inside the workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub dir: PathBuf,
    pub source_roots: Vec<PathBuf>,
}

impl Project {
    fn detect(dir: &Path, config: &Config) -> Self {
        let name = dir_name(dir);
        let source_roots = if config.targets.is_empty() {
            detect_source_roots(dir)
        } else {
            config.targets.iter().map(|t| dir.join(t)).collect()
        };
        debug!("Project {} with {} source roots", name, source_roots.len());

        Self {
            name,
            dir: dir.to_path_buf(),
            source_roots,
        }
    }

    /// Units under the project's source roots
    pub fn units(&self, config: &Config) -> Vec<SourceUnit> {
        FileFinder::new(config).find_units(&self.source_roots)
    }

    pub fn header(&self) -> String {
        format!("\n[Project] {}", self.name)
    }
}

/// A directory of projects
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub projects: Vec<Project>,
}

impl Workspace {
    /// The root is a single project when it carries a marker; otherwise
    /// every immediate subdirectory with a marker is one. A root with no
    /// projects at all is scanned as one implicit project.
    pub fn open(root: &Path, config: &Config) -> Result<Self, WorkspaceError> {
        if !root.exists() {
            return Err(WorkspaceError::NotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(WorkspaceError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let dirs = if has_marker(root) {
            vec![root.to_path_buf()]
        } else {
            let nested = project_dirs(root)?;
            if nested.is_empty() {
                vec![root.to_path_buf()]
            } else {
                nested
            }
        };

        let projects = dirs
            .iter()
            .map(|dir| Project::detect(dir, config))
            .filter(|project| {
                let keep = config.should_scan_project(&project.name);
                if !keep {
                    debug!("Skipping project {}", project.name);
                }
                keep
            })
            .collect();

        Ok(Self {
            root: root.to_path_buf(),
            projects,
        })
    }

    /// `Workspace: <root>` and the rule under it
    pub fn header_lines(&self) -> [String; 2] {
        [
            format!("Workspace: {}", self.root.display()),
            HEADER_RULE.to_string(),
        ]
    }
}

fn has_marker(dir: &Path) -> bool {
    PROJECT_MARKERS.iter().any(|marker| dir.join(marker).is_file())
}

fn project_dirs(root: &Path) -> Result<Vec<PathBuf>, WorkspaceError> {
    let io_err = |source| WorkspaceError::Io {
        path: root.to_path_buf(),
        source,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        let hidden = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if path.is_dir() && !hidden && has_marker(&path) {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

fn detect_source_roots(dir: &Path) -> Vec<PathBuf> {
    let classpath = dir.join(".classpath");
    if classpath.is_file() {
        match classpath_source_roots(&classpath) {
            Ok(roots) if !roots.is_empty() => {
                return roots.into_iter().map(|root| dir.join(root)).collect();
            }
            Ok(_) => debug!("No source entries in {}", classpath.display()),
            Err(e) => warn!("{}", e),
        }
    }

    let conventional: Vec<PathBuf> = ["src/main/java", "src/test/java"]
        .iter()
        .map(|rel| dir.join(rel))
        .filter(|path| path.is_dir())
        .collect();
    if !conventional.is_empty() {
        return conventional;
    }

    let src = dir.join("src");
    if src.is_dir() {
        vec![src]
    } else {
        vec![dir.to_path_buf()]
    }
}

/// `path` attributes of `<classpathentry kind="src">` entries
fn classpath_source_roots(path: &Path) -> Result<Vec<String>, WorkspaceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| WorkspaceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_classpath(&contents).map_err(|message| WorkspaceError::Classpath {
        path: path.to_path_buf(),
        message,
    })
}

fn parse_classpath(contents: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(contents);
    reader.trim_text(true);

    let mut roots = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.name().as_ref() == b"classpathentry" {
                    let mut kind = None;
                    let mut entry_path = None;
                    for attr in e.attributes().filter_map(|a| a.ok()) {
                        let value = String::from_utf8_lossy(&attr.value).to_string();
                        match attr.key.as_ref() {
                            b"kind" => kind = Some(value),
                            b"path" => entry_path = Some(value),
                            _ => {}
                        }
                    }
                    // `/other-project` entries name project dependencies
                    if let (Some("src"), Some(entry_path)) = (kind.as_deref(), entry_path) {
                        if !entry_path.starts_with('/') {
                            roots.push(entry_path);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.to_string()),
            _ => {}
        }
        buf.clear();
    }

    Ok(roots)
}
