use crate::checkers::Checker;
use crate::dispatch::join_all;
use crate::error::Result;
use crate::ignore_set::IgnoreSet;
use crate::model::CheckerOutcome;
use std::path::Path;
use tracing::info;

/// The main analyzer struct.
/// Holds the checkers to run and how ignored paths are resolved.
pub struct Plum<'a> {
    /// Checkers, in report order.
    pub checkers: Vec<Box<dyn Checker + 'a>>,
    /// Name of the custom ignore file, relative to the project root.
    pub ignore_file: String,
    /// When false, neither git nor the ignore file are consulted.
    pub use_ignore: bool,
}

impl<'a> Plum<'a> {
    /// Creates a new `Plum` analyzer with the given checkers.
    pub fn new(checkers: Vec<Box<dyn Checker + 'a>>, ignore_file: String, use_ignore: bool) -> Self {
        Self {
            checkers,
            ignore_file,
            use_ignore,
        }
    }

    /// Resolves what must be skipped under `root`.
    pub fn ignore_set(&self, root: &Path) -> IgnoreSet {
        if self.use_ignore {
            IgnoreSet::resolve(root, &self.ignore_file)
        } else {
            IgnoreSet::default()
        }
    }

    /// Runs the analysis on the specified path.
    ///
    /// This method:
    /// 1. Resolves the ignore set once.
    /// 2. Runs every checker at the same time, each as its own task.
    /// 3. Returns their outcomes in checker order.
    ///
    /// Any checker failure aborts the whole run.
    pub fn analyze(&self, root: &Path) -> Result<Vec<CheckerOutcome>> {
        let ignore = self.ignore_set(root);
        info!(
            root = %root.display(),
            ignored_directories = ignore.directories.len(),
            ignored_files = ignore.files.len(),
            checkers = self.checkers.len(),
            "starting checks"
        );

        let checkers: Vec<&dyn Checker> = self.checkers.iter().map(|c| c.as_ref()).collect();
        join_all(checkers, |checker| checker.run(root, &ignore))
    }
}
