//! Parsers for checker diagnostics.
//!
//! Both checkers print one diagnostic per line in a colon-delimited layout:
//!
//! ```text
//! ./src/main.c:12: MAJOR:C-O1            vera++ -d
//! ./src/main.c:12:MAJOR:C-O1:message     vera++ with message
//! ./app/Main.hs:3: MINOR:H-T1 # message  lambdananas -o vera
//! ```
//!
//! Lines with an unexpected number of fields become special findings and are
//! never counted.

use crate::code_table::CodeTable;
use crate::model::{CheckResult, Finding, Level, LineNumber, SeverityCounts};

fn record_level(counts: &mut SeverityCounts, raw: &str) -> Level {
    let level = Level::parse(raw);
    if let Some(severity) = level.severity() {
        counts.increment(severity);
    }
    level
}

/// Parses `file:line:severity:code[:message]` diagnostics.
///
/// Codes found in `table` get their description attached.
pub fn parse_colon_diagnostics<'a, I>(lines: I, table: &CodeTable) -> CheckResult
where
    I: IntoIterator<Item = &'a str>,
{
    let mut severity_counts = SeverityCounts::default();
    let mut findings = Vec::new();

    for line in lines {
        let fields: Vec<&str> = line.split(':').collect();
        let (file, line_no, level, code, message) = match fields.as_slice() {
            [file, line_no, level, code] => (file, line_no, level, code, None),
            [file, line_no, level, code, message] => (file, line_no, level, code, Some(message)),
            _ => {
                findings.push(Finding::special(line));
                continue;
            }
        };

        let level = record_level(&mut severity_counts, level);
        let code = code.trim();
        findings.push(Finding {
            file: file.to_string(),
            line: LineNumber::parse(line_no),
            level: Some(level),
            code: Some(code.to_string()),
            message: message
                .map(|m| vec![m.trim().to_string()])
                .unwrap_or_default(),
            description: table.describe(code).map(str::to_string),
        });
    }

    CheckResult {
        severity_counts,
        findings,
    }
}

fn hash_parts(field: &str) -> Vec<String> {
    field.split('#').map(|part| part.trim().to_string()).collect()
}

/// Parses `file:line:severity:code # message # ...` diagnostics.
///
/// The `#`-separated parts of the trailing field are trimmed. In the four
/// field layout the first part is the rule code.
pub fn parse_hash_diagnostics<'a, I>(lines: I) -> CheckResult
where
    I: IntoIterator<Item = &'a str>,
{
    let mut severity_counts = SeverityCounts::default();
    let mut findings = Vec::new();

    for line in lines {
        let fields: Vec<&str> = line.split(':').collect();
        let (file, line_no, level, code, message) = match fields.as_slice() {
            [file, line_no, level, rest] => {
                let mut parts = hash_parts(rest);
                let code = parts.remove(0);
                (file, line_no, level, code, parts)
            }
            [file, line_no, level, code, rest] => {
                (file, line_no, level, code.trim().to_string(), hash_parts(rest))
            }
            _ => {
                findings.push(Finding::special(line));
                continue;
            }
        };

        let level = record_level(&mut severity_counts, level);
        findings.push(Finding {
            file: file.to_string(),
            line: LineNumber::parse(line_no),
            level: Some(level),
            code: Some(code),
            message,
            description: None,
        });
    }

    CheckResult {
        severity_counts,
        findings,
    }
}
