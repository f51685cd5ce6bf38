//! Resolution of the paths excluded from checking.
//!
//! Two sources feed the ignore set: the paths git reports as ignored, and a
//! project-local ignore file (`.plumignore` by default) listing paths or glob
//! patterns one per line. Both are optional; a failing source contributes
//! nothing.

use crate::dispatch::finish_stdin_writer;
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Deduplicated directory and file exclusions.
///
/// No entry of `directories` is a string prefix of another one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IgnoreSet {
    pub directories: Vec<String>,
    pub files: Vec<String>,
}

/// Splits raw tool output into non-blank lines.
fn lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.lines().map(str::trim_end).filter(|line| !line.is_empty())
}

fn strip_dot_slash(path: &str) -> &str {
    path.strip_prefix("./").unwrap_or(path)
}

/// True when no entry of `accepted` is a prefix of `path`.
pub fn is_uncovered(path: &str, accepted: &[String]) -> bool {
    !accepted.iter().any(|entry| path.starts_with(entry.as_str()))
}

/// Keeps the shortest, most general entries.
///
/// Candidates are visited shortest first and accepted only when no already
/// accepted entry is a prefix of them, so anything nested under an accepted
/// entry is dropped.
pub fn unique_prefixes(raw: &str) -> Vec<String> {
    let mut candidates: Vec<&str> = lines(raw).collect();
    candidates.sort_by_key(|candidate| candidate.len());

    let mut unique: Vec<String> = Vec::new();
    for candidate in candidates {
        let candidate = strip_dot_slash(candidate);
        if is_uncovered(candidate, &unique) {
            unique.push(candidate.to_string());
        }
    }
    unique
}

/// Files not already covered by one of `directories`, shortest first.
pub fn unique_files(raw: &str, directories: &[String]) -> Vec<String> {
    let mut candidates: Vec<&str> = lines(raw).collect();
    candidates.sort_by_key(|candidate| candidate.len());

    let mut unique: Vec<String> = Vec::new();
    for candidate in candidates {
        let candidate = strip_dot_slash(candidate);
        if is_uncovered(candidate, directories) && !unique.iter().any(|f| f == candidate) {
            unique.push(candidate.to_string());
        }
    }
    unique
}

fn has_wildcard(line: &str) -> bool {
    line.contains(['*', '?', '['])
}

impl IgnoreSet {
    /// Builds the ignore set from raw source texts.
    ///
    /// `root` anchors the filesystem lookups done for custom entries.
    pub fn from_sources(
        root: &Path,
        git_directories: Option<&str>,
        git_files: Option<&str>,
        custom: Option<&str>,
    ) -> Self {
        let directories = git_directories.map(unique_prefixes).unwrap_or_default();
        let files = git_files
            .map(|raw| unique_files(raw, &directories))
            .unwrap_or_default();
        let mut set = Self { directories, files };
        if let Some(custom) = custom {
            set.add_custom(root, custom);
        }
        set
    }

    /// Queries git and reads the custom ignore file under `root`.
    pub fn resolve(root: &Path, ignore_file: &str) -> Self {
        let git_directories = git_check_ignore(root, EntryKind::Directory);
        let git_files = git_check_ignore(root, EntryKind::File);
        let custom = match std::fs::read_to_string(root.join(ignore_file)) {
            Ok(content) => Some(content),
            Err(err) => {
                debug!(file = %ignore_file, error = %err, "no custom ignore file");
                None
            }
        };

        let set = Self::from_sources(
            root,
            git_directories.as_deref(),
            git_files.as_deref(),
            custom.as_deref(),
        );
        debug!(
            directories = set.directories.len(),
            files = set.files.len(),
            "resolved ignore set"
        );
        set
    }

    /// Adds the lines of a custom ignore file.
    ///
    /// Wildcard lines always land in the file set since they are matched at
    /// walk time. Other lines must exist under `root`; they are classified as
    /// directory or file from their metadata.
    pub fn add_custom(&mut self, root: &Path, custom: &str) {
        for line in lines(custom) {
            let line = strip_dot_slash(line).trim_end_matches('/');
            if line.is_empty() {
                continue;
            }
            if has_wildcard(line) {
                self.files.push(line.to_string());
                continue;
            }
            let metadata = match std::fs::symlink_metadata(root.join(line)) {
                Ok(metadata) => metadata,
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => {
                    warn!(path = %line, error = %err, "skipping unreadable ignore entry");
                    continue;
                }
            };
            if !is_uncovered(line, &self.directories) {
                continue;
            }
            if metadata.is_dir() {
                // Entries under the new directory are now redundant.
                self.directories.retain(|d| !d.starts_with(line));
                self.files.retain(|f| !f.starts_with(line));
                self.directories.push(line.to_string());
            } else if !self.files.iter().any(|f| f == line) {
                self.files.push(line.to_string());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty() && self.files.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    File,
}

/// Asks git which of the directories or files under `root` are ignored.
///
/// Paths travel NUL-terminated both ways so git never quotes them; the answer
/// is returned one path per line. Returns `None` when git cannot answer: not
/// installed, not a repository, or nothing ignored (`git check-ignore` exits
/// with 1 in that case).
fn git_check_ignore(root: &Path, kind: EntryKind) -> Option<String> {
    let candidates: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git")
        .filter_map(|e| e.ok())
        .filter(|e| match kind {
            EntryKind::Directory => e.file_type().is_dir(),
            EntryKind::File => !e.file_type().is_dir(),
        })
        .filter_map(|e| {
            let relative = e.path().strip_prefix(root).ok()?;
            Some(format!("./{}", relative.to_string_lossy()))
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let mut child = Command::new("git")
        .args(["check-ignore", "-z", "--stdin"])
        .current_dir(root)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .ok()?;

    let mut stdin = child.stdin.take()?;
    let input: String = candidates.iter().map(|c| format!("{c}\0")).collect();
    let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));
    let output = child.wait_with_output().ok()?;
    finish_stdin_writer("git", writer);

    if !output.status.success() {
        debug!(?kind, status = %output.status, "git check-ignore reported nothing");
        return None;
    }
    let ignored = String::from_utf8_lossy(&output.stdout)
        .split('\0')
        .filter(|path| !path.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    Some(ignored)
}
