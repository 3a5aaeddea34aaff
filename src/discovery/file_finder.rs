use crate::config::Config;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// One Java compilation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// Path to the `.java` file
    pub path: PathBuf,

    /// In-memory contents, used instead of the file when present
    contents: Option<String>,
}

impl SourceUnit {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            contents: None,
        }
    }

    /// A unit whose source is already in memory
    pub fn with_contents(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: Some(contents.into()),
        }
    }

    /// File name, e.g. `Foo.java`
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Contents if held in memory
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// In-memory contents, or the file read from disk
    pub fn read_contents(&self) -> io::Result<String> {
        match &self.contents {
            Some(contents) => Ok(contents.clone()),
            None => std::fs::read_to_string(&self.path),
        }
    }
}

pub fn is_java_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("java")
}

/// Finds `.java` files under a set of source roots
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// All units under `roots`, sorted by path, each once
    pub fn find_units(&self, roots: &[PathBuf]) -> Vec<SourceUnit> {
        let mut paths: Vec<PathBuf> = roots
            .par_iter()
            .flat_map(|root| self.scan_directory(root))
            .collect();
        paths.sort();
        paths.dedup();

        debug!("Found {} Java files", paths.len());
        paths.into_iter().map(SourceUnit::new).collect()
    }

    fn scan_directory(&self, dir: &Path) -> Vec<PathBuf> {
        if !dir.exists() {
            trace!("Directory does not exist: {}", dir.display());
            return Vec::new();
        }

        let walker = WalkBuilder::new(dir)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .follow_links(false)
            .build();

        walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();
                if !is_java_file(path) {
                    return None;
                }

                // Patterns see the path below the source root, rooted at `/`
                let relative = Path::new("/").join(path.strip_prefix(dir).unwrap_or(path));
                if self.config.should_exclude(&relative) {
                    trace!("Excluding: {}", path.display());
                    return None;
                }

                trace!("Found: {}", path.display());
                Some(path.to_path_buf())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_is_java_file() {
        assert!(is_java_file(Path::new("src/Main.java")));
        assert!(!is_java_file(Path::new("src/Main.kt")));
        assert!(!is_java_file(Path::new("README")));
    }

    #[test]
    fn test_source_unit_contents() {
        let unit = SourceUnit::with_contents("a/Foo.java", "class Foo {}");
        assert_eq!(unit.file_name(), "Foo.java");
        assert_eq!(unit.read_contents().unwrap(), "class Foo {}");
    }

    #[test]
    fn test_find_units_sorted_and_excluded() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("b")).unwrap();
        fs::create_dir_all(src.join("a")).unwrap();
        fs::create_dir_all(src.join("generated")).unwrap();
        fs::write(src.join("b/B.java"), "class B {}").unwrap();
        fs::write(src.join("a/A.java"), "class A {}").unwrap();
        fs::write(src.join("a/notes.txt"), "x").unwrap();
        fs::write(src.join("generated/G.java"), "class G {}").unwrap();

        let config = Config::default();
        let units = FileFinder::new(&config).find_units(&[src.clone(), src.clone()]);
        let names: Vec<String> = units.iter().map(|u| u.file_name()).collect();
        assert_eq!(names, vec!["A.java", "B.java"]);
    }
}
