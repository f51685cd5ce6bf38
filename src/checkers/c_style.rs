use super::Checker;
use crate::code_table::CodeTable;
use crate::dispatch::{dispatch, ChunkRunner, StdinRunner, ToolCommand};
use crate::error::Result;
use crate::ignore_set::IgnoreSet;
use crate::model::CheckResult;
use crate::parser::parse_colon_diagnostics;
use crate::walker::DirectoryWalker;
use std::path::Path;
use tracing::info;

/// Directories never handed to vera++.
pub const DEFAULT_EXCLUDES: [&str; 3] = ["tests", "bonus", ".git"];

/// Walks the project and checks the surviving files with vera++.
///
/// Files are split into chunks that run as concurrent vera++ processes, each
/// receiving its file list on stdin.
pub struct CStyleChecker<'a> {
    pub command: ToolCommand,
    pub excludes: Vec<String>,
    pub table: &'a CodeTable,
    pub parallelism: usize,
}

impl<'a> CStyleChecker<'a> {
    pub fn new(command: ToolCommand, table: &'a CodeTable, parallelism: usize) -> Self {
        Self {
            command,
            excludes: DEFAULT_EXCLUDES.iter().map(|d| d.to_string()).collect(),
            table,
            parallelism,
        }
    }

    /// The files vera++ will see, `./`-prefixed, in walk order.
    pub fn included_files(&self, root: &Path, ignore: &IgnoreSet) -> Result<Vec<String>> {
        let walker = DirectoryWalker::new(
            self.excludes.iter().chain(&ignore.directories),
            &ignore.files,
        );
        walker.walk(root)
    }

    /// Same as [`Checker::check`] with a custom chunk runner.
    pub fn check_with<R: ChunkRunner + ?Sized>(
        &self,
        root: &Path,
        ignore: &IgnoreSet,
        runner: &R,
    ) -> Result<CheckResult> {
        let files = self.included_files(root, ignore)?;
        let lines = dispatch(&files, runner, self.parallelism)?;
        let result = parse_colon_diagnostics(lines.iter().map(String::as_str), self.table);
        info!(
            checker = "C",
            files = files.len(),
            findings = result.findings.len(),
            "checker finished"
        );
        Ok(result)
    }
}

impl Checker for CStyleChecker<'_> {
    fn name(&self) -> &str {
        "C"
    }

    fn check(&self, root: &Path, ignore: &IgnoreSet) -> Result<CheckResult> {
        let runner = StdinRunner {
            command: &self.command,
            cwd: root,
        };
        self.check_with(root, ignore, &runner)
    }
}
