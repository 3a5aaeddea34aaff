use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a deprecation scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Source roots, relative to each project; overrides detection
    pub targets: Vec<PathBuf>,

    /// Patterns to exclude from scanning
    pub exclude: Vec<String>,

    /// Project names to scan; empty scans all
    pub projects: Vec<String>,

    /// Package prefixes or globs to report; empty reports all
    pub packages: Vec<String>,

    /// Report configuration
    pub report: ReportConfig,

    /// Scan configuration
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Report compile errors
    pub errors: bool,

    /// Report deprecated usages
    pub deprecations: bool,

    /// Print the workspace and project header lines
    pub header: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Parse and resolve units on the rayon pool
    pub parallel: bool,

    /// `javac` output to read compile errors from
    pub javac_log: Option<PathBuf>,

    /// Report syntax errors found by the parser
    pub syntax_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: vec![],
            exclude: vec![
                "**/build/**".to_string(),
                "**/target/**".to_string(),
                "**/bin/**".to_string(),
                "**/generated/**".to_string(),
                "**/.gradle/**".to_string(),
                "**/.idea/**".to_string(),
            ],
            projects: vec![],
            packages: vec![],
            report: ReportConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            errors: true,
            deprecations: true,
            header: true,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            javac_log: None,
            syntax_errors: true,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(workspace_root: &Path) -> Result<Self> {
        let default_names = [
            ".deprecated.yml",
            ".deprecated.yaml",
            ".deprecated.toml",
            "deprecated.yml",
            "deprecated.yaml",
            "deprecated.toml",
        ];

        for name in &default_names {
            let path = workspace_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Check if a pattern matches for exclusion
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.exclude.iter().any(|pattern| glob_match(pattern, &path_str))
    }

    /// Whether units of `package` are reported
    pub fn should_report_package(&self, package: &str) -> bool {
        self.packages.is_empty()
            || self.packages.iter().any(|filter| package_matches(filter, package))
    }

    /// Whether the project named `name` is scanned
    pub fn should_scan_project(&self, name: &str) -> bool {
        self.projects.is_empty() || self.projects.iter().any(|p| p == name || glob_match(p, name))
    }
}

/// `com.example` matches itself and its subpackages; patterns with `*`
/// are globs over the dotted name.
fn package_matches(filter: &str, package: &str) -> bool {
    if filter.contains('*') {
        return glob_match(filter, package);
    }
    package == filter
        || package
            .strip_prefix(filter)
            .map(|rest| rest.starts_with('.'))
            .unwrap_or(false)
}

/// Simple glob matching for patterns like "*Test", "com.acme.*" or "**/build/**"
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern.starts_with('*') && !pattern.contains('/') && pattern.matches('*').count() == 1 {
        return text.ends_with(&pattern[1..]);
    }

    if pattern.ends_with('*') && !pattern.contains('/') && pattern.matches('*').count() == 1 {
        return text.starts_with(&pattern[..pattern.len() - 1]);
    }

    if pattern.contains("**") {
        // "**/build/**" matches a whole directory name anywhere in the path
        if pattern.starts_with("**/") && pattern.ends_with("/**") {
            let dir_name = pattern.trim_start_matches("**/").trim_end_matches("/**");
            return text.contains(&format!("/{}/", dir_name));
        }

        let parts: Vec<&str> = pattern.split("**").collect();
        if parts.len() == 2 {
            let prefix = parts[0].trim_end_matches('/');
            let suffix = parts[1].trim_start_matches('/');

            if prefix.is_empty() && suffix.is_empty() {
                return true;
            }
            if prefix.is_empty() {
                return text.ends_with(suffix) || text.contains(&format!("/{}", suffix));
            }
            if suffix.is_empty() {
                return text.starts_with(prefix) || text.contains(&format!("{}/", prefix));
            }
            return (text.starts_with(prefix) || text.contains(&format!("/{}/", prefix)))
                && (text.ends_with(suffix) || text.contains(&format!("/{}", suffix)));
        }
    }

    if pattern.contains('*') {
        return wildcard_match(pattern, text);
    }

    text == pattern
}

/// `*` matches any run of characters
fn wildcard_match(pattern: &str, text: &str) -> bool {
    let pieces: Vec<&str> = pattern.split('*').collect();
    let (first, rest) = match pieces.split_first() {
        Some(split) => split,
        None => return text.is_empty(),
    };
    let Some(mut remaining) = text.strip_prefix(first) else {
        return false;
    };
    let Some((last, middle)) = rest.split_last() else {
        return remaining.is_empty();
    };

    for piece in middle {
        match remaining.find(piece) {
            Some(index) => remaining = &remaining[index + piece.len()..],
            None => return false,
        }
    }
    remaining.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_glob_match_suffix_and_prefix() {
        assert!(glob_match("*Test", "FooTest"));
        assert!(!glob_match("*Test", "TestFoo"));
        assert!(glob_match("com.acme.*", "com.acme.util"));
        assert!(!glob_match("com.acme.*", "org.acme.util"));
    }

    #[test]
    fn test_glob_match_path() {
        assert!(glob_match("**/build/**", "/project/build/Out.java"));
        assert!(!glob_match("**/build/**", "/project/builder/Out.java"));
        assert!(glob_match("**/*Test.java", "/a/b/FooTest.java"));
    }

    #[test]
    fn test_wildcard_match() {
        assert!(wildcard_match("com.*.internal.*", "com.acme.internal.io"));
        assert!(!wildcard_match("com.*.internal.*", "com.acme.api.io"));
        assert!(wildcard_match("a*", "a"));
    }

    #[test]
    fn test_package_filter() {
        let config = Config {
            packages: vec!["com.acme".to_string(), "org.*.legacy".to_string()],
            ..Config::default()
        };
        assert!(config.should_report_package("com.acme"));
        assert!(config.should_report_package("com.acme.io"));
        assert!(!config.should_report_package("com.acmex"));
        assert!(config.should_report_package("org.foo.legacy"));
        assert!(!config.should_report_package(""));
        assert!(Config::default().should_report_package(""));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.report.errors);
        assert!(config.report.deprecations);
        assert!(!config.scan.parallel);
        assert!(config.should_exclude(Path::new("/app/build/R.java")));
    }

    #[test]
    fn test_from_yaml_and_toml() {
        let temp = TempDir::new().unwrap();
        let yaml = temp.path().join("deprecated.yml");
        std::fs::write(
            &yaml,
            "packages:\n  - com.acme\nscan:\n  parallel: true\nreport:\n  errors: false\n",
        )
        .unwrap();
        let config = Config::from_file(&yaml).unwrap();
        assert_eq!(config.packages, vec!["com.acme".to_string()]);
        assert!(config.scan.parallel);
        assert!(!config.report.errors);
        assert!(config.report.deprecations);

        let toml_path = temp.path().join("deprecated.toml");
        std::fs::write(&toml_path, "projects = [\"core\"]\n[scan]\njavac_log = \"build.log\"\n").unwrap();
        let config = Config::from_file(&toml_path).unwrap();
        assert_eq!(config.projects, vec!["core".to_string()]);
        assert_eq!(config.scan.javac_log, Some(PathBuf::from("build.log")));
        assert!(config.scan.syntax_errors);
    }

    #[test]
    fn test_default_locations() {
        let temp = TempDir::new().unwrap();
        assert_eq!(Config::from_default_locations(temp.path()).unwrap(), Config::default());

        std::fs::write(temp.path().join(".deprecated.yaml"), "projects: [app]\n").unwrap();
        let config = Config::from_default_locations(temp.path()).unwrap();
        assert!(config.should_scan_project("app"));
        assert!(!config.should_scan_project("lib"));
    }
}
