use crate::error::{CheckError, Result};
use glob::{MatchOptions, Pattern};
use std::path::Path;
use walkdir::WalkDir;

/// Single-segment matching: `*` never crosses a `/`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled ignore entry.
///
/// Entries that are not valid glob syntax are compared literally.
#[derive(Debug)]
enum Matcher {
    Glob(Pattern),
    Literal(String),
}

impl Matcher {
    fn new(pattern: &str) -> Self {
        match Pattern::new(pattern) {
            Ok(glob) => Matcher::Glob(glob),
            Err(_) => Matcher::Literal(pattern.to_string()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Matcher::Glob(glob) => glob.matches_with(path, MATCH_OPTIONS),
            Matcher::Literal(literal) => literal == path,
        }
    }
}

/// Depth-first file enumeration that honours an ignore set.
pub struct DirectoryWalker {
    directories: Vec<Matcher>,
    files: Vec<Matcher>,
}

impl DirectoryWalker {
    /// `directories` patterns apply to every entry and prune whole subtrees;
    /// `files` patterns apply to files only.
    pub fn new<D, F>(directories: D, files: F) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        Self {
            directories: directories
                .into_iter()
                .map(|p| Matcher::new(p.as_ref()))
                .collect(),
            files: files.into_iter().map(|p| Matcher::new(p.as_ref())).collect(),
        }
    }

    fn is_ignored(&self, relative: &str, is_dir: bool) -> bool {
        if self.directories.iter().any(|m| m.matches(relative)) {
            return true;
        }
        !is_dir && self.files.iter().any(|m| m.matches(relative))
    }

    /// Lists the files under `root` that survive the ignore patterns.
    ///
    /// Paths are relative to `root`, `/`-separated and prefixed with `./`,
    /// in walk order. The first traversal error aborts the walk.
    pub fn walk(&self, root: &Path) -> Result<Vec<String>> {
        let mut included = Vec::new();
        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let relative = relative_path(root, entry.path());
                !self.is_ignored(&relative, entry.file_type().is_dir())
            });

        for entry in entries {
            let entry = entry.map_err(|source| CheckError::Walk {
                path: root.to_path_buf(),
                source,
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            included.push(format!("./{}", relative_path(root, entry.path())));
        }
        Ok(included)
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
