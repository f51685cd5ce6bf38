use plum_rs::analyzer::Plum;
use plum_rs::checkers::Checker;
use plum_rs::code_table::CodeTable;
use plum_rs::error::{CheckError, Result};
use plum_rs::ignore_set::IgnoreSet;
use plum_rs::model::CheckResult;
use plum_rs::parser::parse_colon_diagnostics;
use plum_rs::report::{render, Theme};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

/// A checker that answers with canned diagnostics after a delay.
struct Canned {
    name: &'static str,
    delay_ms: u64,
    output: &'static str,
}

impl Checker for Canned {
    fn name(&self) -> &str {
        self.name
    }

    fn check(&self, _root: &Path, _ignore: &IgnoreSet) -> Result<CheckResult> {
        std::thread::sleep(Duration::from_millis(self.delay_ms));
        Ok(parse_colon_diagnostics(self.output.lines(), &CodeTable::default()))
    }
}

/// A checker that records the ignore set it was given.
struct IgnoreProbe;

impl Checker for IgnoreProbe {
    fn name(&self) -> &str {
        "Probe"
    }

    fn check(&self, _root: &Path, ignore: &IgnoreSet) -> Result<CheckResult> {
        let lines: Vec<String> = ignore
            .files
            .iter()
            .map(|f| format!("{f}:1: INFO:IGN"))
            .collect();
        Ok(parse_colon_diagnostics(lines.iter().map(String::as_str), &CodeTable::default()))
    }
}

struct Broken;

impl Checker for Broken {
    fn name(&self) -> &str {
        "Broken"
    }

    fn check(&self, _root: &Path, _ignore: &IgnoreSet) -> Result<CheckResult> {
        Err(CheckError::Spawn {
            program: "broken".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
        })
    }
}

#[test]
fn test_outcomes_follow_checker_order() {
    let dir = tempdir().unwrap();
    let checkers: Vec<Box<dyn Checker>> = vec![
        Box::new(Canned {
            name: "C",
            delay_ms: 50,
            output: "./main.c:2: MAJOR:C-O1\n",
        }),
        Box::new(Canned {
            name: "Haskell",
            delay_ms: 0,
            output: "./Main.hs:1: MINOR:H-T1\n",
        }),
    ];
    let plum = Plum::new(checkers, ".plumignore".to_string(), false);

    let outcomes = plum.analyze(dir.path()).unwrap();
    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, vec!["C", "Haskell"]);
    assert_eq!(outcomes[0].title, "C Style results");
    assert_eq!(outcomes[0].result.severity_counts.major, 1);
    assert_eq!(outcomes[1].result.severity_counts.minor, 1);

    let report = render(&outcomes, &Theme::plain());
    assert!(report.has_errors);
    assert!(report.text.find("C Style results").unwrap() < report.text.find("Haskell Style results").unwrap());
}

#[test]
fn test_one_failing_checker_aborts_run() {
    let dir = tempdir().unwrap();
    let checkers: Vec<Box<dyn Checker>> = vec![
        Box::new(Canned {
            name: "C",
            delay_ms: 0,
            output: "",
        }),
        Box::new(Broken),
    ];
    let plum = Plum::new(checkers, ".plumignore".to_string(), false);

    let err = plum.analyze(dir.path()).unwrap_err();
    assert!(err.to_string().contains("broken"));
}

#[test]
fn test_ignore_file_is_honoured() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".plumignore"), "*.hi\n").unwrap();

    let checkers: Vec<Box<dyn Checker>> = vec![Box::new(IgnoreProbe)];
    let with_ignore = Plum::new(checkers, ".plumignore".to_string(), true);
    let outcomes = with_ignore.analyze(dir.path()).unwrap();
    assert_eq!(outcomes[0].result.findings[0].file, "*.hi");

    let checkers: Vec<Box<dyn Checker>> = vec![Box::new(IgnoreProbe)];
    let without_ignore = Plum::new(checkers, ".plumignore".to_string(), false);
    let outcomes = without_ignore.analyze(dir.path()).unwrap();
    assert!(outcomes[0].result.findings.is_empty());
}

#[test]
fn test_clean_run_reports_no_errors() {
    let dir = tempdir().unwrap();
    let checkers: Vec<Box<dyn Checker>> = vec![
        Box::new(Canned {
            name: "C",
            delay_ms: 0,
            output: "",
        }),
        Box::new(Canned {
            name: "Haskell",
            delay_ms: 0,
            output: "",
        }),
    ];
    let plum = Plum::new(checkers, ".plumignore".to_string(), false);

    let outcomes = plum.analyze(dir.path()).unwrap();
    let report = render(&outcomes, &Theme::plain());
    assert!(!report.has_errors);
    assert_eq!(report.text, "No errors found\n");
}
