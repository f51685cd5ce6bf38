use super::Checker;
use crate::dispatch::ToolCommand;
use crate::error::Result;
use crate::ignore_set::IgnoreSet;
use crate::model::CheckResult;
use crate::parser::parse_hash_diagnostics;
use std::path::Path;
use tracing::info;

/// Paths lambdananas always skips.
pub const DEFAULT_EXCLUDES: [&str; 7] = [
    "Setup.hs",
    "setup.hs",
    ".git",
    ".stack-work",
    "test",
    "tests",
    "bonus",
];

/// Checks the whole project with a single lambdananas run.
///
/// lambdananas scans the tree itself, so ignored paths are passed through
/// its `--exclude` option instead of being walked here.
pub struct HaskellStyleChecker {
    pub command: ToolCommand,
    pub excludes: Vec<String>,
}

impl HaskellStyleChecker {
    pub fn new(command: ToolCommand) -> Self {
        Self {
            command,
            excludes: DEFAULT_EXCLUDES.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Colon-separated exclusion list: defaults first, then ignored
    /// directories and files without their `./` prefix.
    pub fn exclude_list(&self, ignore: &IgnoreSet) -> String {
        self.excludes
            .iter()
            .chain(&ignore.directories)
            .chain(&ignore.files)
            .map(|p| p.strip_prefix("./").unwrap_or(p))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(":")
    }

    pub fn arguments(&self, ignore: &IgnoreSet) -> Vec<String> {
        vec![
            "--exclude".to_string(),
            self.exclude_list(ignore),
            ".".to_string(),
        ]
    }
}

impl Checker for HaskellStyleChecker {
    fn name(&self) -> &str {
        "Haskell"
    }

    fn check(&self, root: &Path, ignore: &IgnoreSet) -> Result<CheckResult> {
        let output = self.command.run(root, &self.arguments(ignore), None)?;
        let result = parse_hash_diagnostics(output.lines().filter(|l| !l.trim().is_empty()));
        info!(
            checker = "Haskell",
            findings = result.findings.len(),
            "checker finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckError;
    use tempfile::tempdir;

    fn ignore() -> IgnoreSet {
        IgnoreSet {
            directories: vec!["dist-newstyle".to_string()],
            files: vec!["./Gen.hs".to_string(), "*.hi".to_string()],
        }
    }

    #[test]
    fn test_exclude_list_joins_defaults_and_ignored() {
        let checker = HaskellStyleChecker::new(ToolCommand::new("lambdananas", vec![]));
        assert_eq!(
            checker.exclude_list(&ignore()),
            "Setup.hs:setup.hs:.git:.stack-work:test:tests:bonus:dist-newstyle:Gen.hs:*.hi"
        );
    }

    #[test]
    fn test_exclude_list_without_ignores() {
        let checker = HaskellStyleChecker::new(ToolCommand::new("lambdananas", vec![]));
        assert!(!checker.exclude_list(&IgnoreSet::default()).ends_with(':'));
    }

    #[cfg(unix)]
    #[test]
    fn test_check_runs_tool_in_root() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Main.hs"), "").unwrap();
        // Stands in for lambdananas: checks its arguments and cwd, then
        // reports one diagnostic followed by a blank line.
        let script = r#"[ "$1" = "--exclude" ] && [ "$3" = "." ] && [ -f Main.hs ] || exit 9
printf './Main.hs:3: MINOR:H-T1 # No signature # for main\n\n'"#;
        let command = ToolCommand::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "lambdananas".to_string()],
        );
        let checker = HaskellStyleChecker::new(command);
        let result = checker.check(dir.path(), &IgnoreSet::default()).unwrap();

        assert_eq!(result.severity_counts.minor, 1);
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].code.as_deref(), Some("H-T1"));
        assert_eq!(
            result.findings[0].message,
            vec!["No signature".to_string(), "for main".to_string()]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_aborts() {
        let dir = tempdir().unwrap();
        let command = ToolCommand::new("sh", vec!["-c".to_string(), "exit 1".to_string()]);
        let checker = HaskellStyleChecker::new(command);
        let err = checker.check(dir.path(), &IgnoreSet::default()).unwrap_err();
        assert!(matches!(err, CheckError::ToolFailed { .. }));
    }
}
