// Checkers module
// Each checker binds an external tool, the way files are handed to it, and
// the parser for its output.

use crate::error::Result;
use crate::ignore_set::IgnoreSet;
use crate::model::{CheckResult, CheckerOutcome};
use std::path::Path;

/// C coding style, checked with vera++ on walked files.
pub mod c_style;

/// Haskell coding style, checked with lambdananas using its own exclusions.
pub mod haskell_style;

/// A coding-style checker backed by an external program.
pub trait Checker: Sync {
    /// Short name used in tallies.
    fn name(&self) -> &str;

    /// Runs the checker over the project at `root`.
    fn check(&self, root: &Path, ignore: &IgnoreSet) -> Result<CheckResult>;

    fn title(&self) -> String {
        format!("{} Style results", self.name())
    }

    fn run(&self, root: &Path, ignore: &IgnoreSet) -> Result<CheckerOutcome> {
        Ok(CheckerOutcome {
            name: self.name().to_string(),
            title: self.title(),
            result: self.check(root, ignore)?,
        })
    }
}
