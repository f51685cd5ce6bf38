use crate::model::{CheckerOutcome, Finding, Level, LineNumber, Severity, SeverityCounts};
use colored::{Color, ColoredString, Colorize};
use std::fmt::Write;

/// Text style of one report element.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: Option<Color>,
    pub bold: bool,
    pub underline: bool,
}

impl Style {
    const fn new(color: Color, bold: bool, underline: bool) -> Self {
        Self {
            color: Some(color),
            bold,
            underline,
        }
    }

    const fn plain() -> Self {
        Self {
            color: None,
            bold: false,
            underline: false,
        }
    }

    const fn bold() -> Self {
        Self {
            color: None,
            bold: true,
            underline: false,
        }
    }

    fn paint(&self, text: &str) -> ColoredString {
        let mut out = ColoredString::from(text);
        if let Some(color) = self.color {
            out = out.color(color);
        }
        if self.bold {
            out = out.bold();
        }
        if self.underline {
            out = out.underline();
        }
        out
    }
}

/// Color map of the report.
#[derive(Debug, Clone)]
pub struct Theme {
    pub fatal: Style,
    pub major: Style,
    pub minor: Style,
    pub info: Style,
    pub title: Style,
    pub special: Style,
    pub location: Style,
    pub ok: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fatal: Style::new(Color::BrightRed, true, true),
            major: Style::new(Color::BrightRed, true, false),
            minor: Style::new(Color::BrightYellow, true, false),
            info: Style::new(Color::BrightCyan, true, false),
            title: Style::bold(),
            special: Style::new(Color::BrightBlue, true, false),
            location: Style::new(Color::BrightBlack, false, false),
            ok: Style::new(Color::BrightGreen, false, false),
        }
    }
}

impl Theme {
    /// No colors at all, independent of the terminal.
    pub fn plain() -> Self {
        Self {
            fatal: Style::plain(),
            major: Style::plain(),
            minor: Style::plain(),
            info: Style::plain(),
            title: Style::plain(),
            special: Style::plain(),
            location: Style::plain(),
            ok: Style::plain(),
        }
    }

    pub fn severity(&self, severity: Severity) -> &Style {
        match severity {
            Severity::Fatal => &self.fatal,
            Severity::Major => &self.major,
            Severity::Minor => &self.minor,
            Severity::Info => &self.info,
        }
    }
}

/// A rendered report and its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub text: String,
    /// True when at least one counted finding exists.
    pub has_errors: bool,
}

/// Findings grouped by file in first-seen order.
///
/// Within a file, findings are sorted by line number; findings without a
/// numeric line follow in their original order.
pub fn group_by_file(findings: &[Finding]) -> Vec<(&str, Vec<&Finding>)> {
    let mut groups: Vec<(&str, Vec<&Finding>)> = Vec::new();
    for finding in findings {
        match groups.iter_mut().find(|(file, _)| *file == finding.file) {
            Some((_, group)) => group.push(finding),
            None => groups.push((finding.file.as_str(), vec![finding])),
        }
    }
    for (_, group) in &mut groups {
        group.sort_by_key(|f| (f.line.number().is_none(), f.line.number()));
    }
    groups
}

fn render_location(theme: &Theme, file: &str, line: &LineNumber) -> ColoredString {
    let location = match line {
        LineNumber::Number(n) => format!("({file}:{n})"),
        LineNumber::Malformed(raw) => format!("({file}:{raw})"),
        LineNumber::Missing => format!("({file})"),
    };
    theme.location.paint(&location)
}

fn render_finding(out: &mut String, theme: &Theme, finding: &Finding) {
    out.push_str("    ");
    let location = render_location(theme, &finding.file, &finding.line);
    let code = finding.code.as_deref().unwrap_or_default();
    let _ = match &finding.level {
        Some(Level::Known(severity)) => writeln!(
            out,
            "{} - {} {}",
            theme
                .severity(*severity)
                .paint(&format!("[{severity}] ({code})")),
            finding.detail(),
            location
        ),
        Some(Level::Other(raw)) => {
            let detail = finding.detail();
            let content = [raw.as_str(), code, detail.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{} - {} {}", theme.special.paint("[SPECIAL]"), content, location)
        }
        None => writeln!(
            out,
            "{} - {} {}",
            theme.special.paint("[SPECIAL]"),
            finding.detail(),
            location
        ),
    };
}

fn render_tally(out: &mut String, theme: &Theme, counts: &SeverityCounts) {
    let line = [
        Severity::Fatal,
        Severity::Major,
        Severity::Minor,
        Severity::Info,
    ]
    .into_iter()
    .map(|severity| {
        format!(
            "{} : {}",
            theme.severity(severity).paint(&format!("[{severity}]")),
            counts.get(severity)
        )
    })
    .collect::<Vec<_>>()
    .join(" | ");
    out.push_str(&line);
    out.push('\n');
}

/// Severity counts summed over all checkers.
pub fn global_counts(outcomes: &[CheckerOutcome]) -> SeverityCounts {
    let mut global = SeverityCounts::default();
    for outcome in outcomes {
        global.merge(&outcome.result.severity_counts);
    }
    global
}

/// The verdict: true when any checker counted a finding.
pub fn has_errors(outcomes: &[CheckerOutcome]) -> bool {
    global_counts(outcomes).total() > 0
}

/// Renders the report for all checkers.
///
/// Listings come first, checker by checker, followed by one tally per
/// listed checker and a global tally.
pub fn render(outcomes: &[CheckerOutcome], theme: &Theme) -> Report {
    let global = global_counts(outcomes);

    let mut out = String::new();
    if global.total() == 0 {
        let _ = writeln!(out, "{}", theme.ok.paint("No errors found"));
        return Report {
            text: out,
            has_errors: false,
        };
    }

    let listed: Vec<&CheckerOutcome> = outcomes
        .iter()
        .filter(|outcome| !outcome.result.findings.is_empty())
        .collect();

    for outcome in &listed {
        let _ = writeln!(out, "\n{}\n", theme.info.paint(&outcome.title));
        for (file, findings) in group_by_file(&outcome.result.findings) {
            let _ = writeln!(out, "\n{}", theme.title.paint(&format!("‣ In File {file}")));
            for finding in findings {
                render_finding(&mut out, theme, finding);
            }
        }
    }

    for outcome in &listed {
        let _ = writeln!(
            out,
            "\n{}",
            theme.title.paint(&format!("{} Error Report:", outcome.name))
        );
        render_tally(&mut out, theme, &outcome.result.severity_counts);
    }
    let _ = writeln!(out, "\n{}", theme.title.paint("Global Error Report:"));
    render_tally(&mut out, theme, &global);

    Report {
        text: out,
        has_errors: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CheckResult;

    fn finding(file: &str, line: usize, severity: Severity) -> Finding {
        Finding {
            file: file.to_string(),
            line: LineNumber::Number(line),
            level: Some(Level::Known(severity)),
            code: Some("C-L1".to_string()),
            message: vec![],
            description: Some("Code line content".to_string()),
        }
    }

    fn outcome(name: &str, findings: Vec<Finding>) -> CheckerOutcome {
        let mut counts = SeverityCounts::default();
        for f in &findings {
            if let Some(severity) = f.level.as_ref().and_then(Level::severity) {
                counts.increment(severity);
            }
        }
        CheckerOutcome {
            name: name.to_string(),
            title: format!("{name} Style results"),
            result: CheckResult {
                severity_counts: counts,
                findings,
            },
        }
    }

    #[test]
    fn test_no_errors_notice() {
        let report = render(&[outcome("C", vec![]), outcome("Haskell", vec![])], &Theme::plain());
        assert!(!report.has_errors);
        assert_eq!(report.text, "No errors found\n");
    }

    #[test]
    fn test_special_only_findings_do_not_fail() {
        let report = render(
            &[outcome("C", vec![Finding::special("garbage out")])],
            &Theme::plain(),
        );
        assert!(!report.has_errors);
        assert_eq!(report.text, "No errors found\n");
    }

    #[test]
    fn test_lines_sorted_within_file() {
        let findings = vec![
            finding("./a.c", 50, Severity::Minor),
            finding("./a.c", 3, Severity::Major),
            finding("./a.c", 17, Severity::Info),
        ];
        let groups = group_by_file(&findings);
        let lines: Vec<_> = groups[0].1.iter().map(|f| f.line.number()).collect();
        assert_eq!(lines, vec![Some(3), Some(17), Some(50)]);

        let report = render(&[outcome("C", findings)], &Theme::plain());
        let p3 = report.text.find("(./a.c:3)").unwrap();
        let p17 = report.text.find("(./a.c:17)").unwrap();
        let p50 = report.text.find("(./a.c:50)").unwrap();
        assert!(p3 < p17 && p17 < p50);
    }

    #[test]
    fn test_lineless_findings_sort_last() {
        let mut malformed = finding("./a.c", 0, Severity::Info);
        malformed.line = LineNumber::Malformed("x".to_string());
        let findings = vec![malformed, finding("./a.c", 9, Severity::Info)];
        let groups = group_by_file(&findings);
        assert_eq!(groups[0].1[0].line, LineNumber::Number(9));
        assert_eq!(groups[0].1[1].line, LineNumber::Malformed("x".to_string()));
    }

    #[test]
    fn test_files_keep_first_seen_order() {
        let findings = vec![
            finding("./z.c", 1, Severity::Info),
            finding("./a.c", 1, Severity::Info),
            finding("./z.c", 2, Severity::Info),
        ];
        let files: Vec<&str> = group_by_file(&findings).into_iter().map(|(f, _)| f).collect();
        assert_eq!(files, vec!["./z.c", "./a.c"]);
    }

    #[test]
    fn test_full_report_layout() {
        let c = outcome(
            "C",
            vec![
                finding("./main.c", 4, Severity::Major),
                Finding::special("vera++: warning"),
            ],
        );
        let haskell = outcome("Haskell", vec![]);
        let report = render(&[c, haskell], &Theme::plain());

        assert!(report.has_errors);
        let text = &report.text;
        assert!(text.contains("C Style results"));
        assert!(!text.contains("Haskell Style results"));
        assert!(text.contains("‣ In File ./main.c"));
        assert!(text.contains("    [MAJOR] (C-L1) - Code line content (./main.c:4)\n"));
        assert!(text.contains("    [SPECIAL] - vera++: warning (vera++:)\n"));
        assert!(text.contains("C Error Report:\n[FATAL] : 0 | [MAJOR] : 1 | [MINOR] : 0 | [INFO] : 0\n"));
        assert!(text.contains("Global Error Report:\n[FATAL] : 0 | [MAJOR] : 1 | [MINOR] : 0 | [INFO] : 0\n"));
        assert!(text.find("C Error Report").unwrap() > text.find("‣ In File").unwrap());
    }

    #[test]
    fn test_unknown_severity_rendered_as_special() {
        let mut odd = finding("./a.c", 7, Severity::Info);
        odd.level = Some(Level::Other("NOTE".to_string()));
        let report = render(
            &[outcome("C", vec![odd, finding("./a.c", 1, Severity::Info)])],
            &Theme::plain(),
        );
        assert!(report
            .text
            .contains("    [SPECIAL] - NOTE C-L1 Code line content (./a.c:7)\n"));
    }

    #[test]
    fn test_global_tally_sums_checkers() {
        let c = outcome("C", vec![finding("./a.c", 1, Severity::Fatal)]);
        let haskell = outcome("Haskell", vec![finding("./Main.hs", 2, Severity::Fatal)]);
        let report = render(&[c, haskell], &Theme::plain());
        assert!(report
            .text
            .contains("Global Error Report:\n[FATAL] : 2 | [MAJOR] : 0 | [MINOR] : 0 | [INFO] : 0\n"));
    }
}
