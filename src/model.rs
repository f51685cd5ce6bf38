use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Severity of a coding-style violation, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Minor,
    Major,
    Fatal,
}

impl Severity {
    /// All severities, least severe first.
    pub const ALL: [Severity; 4] = [
        Severity::Info,
        Severity::Minor,
        Severity::Major,
        Severity::Fatal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Minor => "MINOR",
            Severity::Major => "MAJOR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ();

    /// Only the exact upper-case tokens emitted by the checkers are recognized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INFO" => Ok(Severity::Info),
            "MINOR" => Ok(Severity::Minor),
            "MAJOR" => Ok(Severity::Major),
            "FATAL" => Ok(Severity::Fatal),
            _ => Err(()),
        }
    }
}

/// The severity field of a diagnostic line.
///
/// Tokens outside the four known severities are kept verbatim so they can
/// still be shown, but they are never counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Level {
    Known(Severity),
    Other(String),
}

impl Level {
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim();
        match token.parse() {
            Ok(severity) => Level::Known(severity),
            Err(()) => Level::Other(token.to_string()),
        }
    }

    pub fn severity(&self) -> Option<Severity> {
        match self {
            Level::Known(severity) => Some(*severity),
            Level::Other(_) => None,
        }
    }
}

/// Line locator of a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LineNumber {
    Number(usize),
    /// The checker printed something that is not a line number.
    Malformed(String),
    Missing,
}

impl LineNumber {
    pub fn parse(raw: &str) -> Self {
        let token = raw.trim();
        if token.is_empty() {
            return LineNumber::Missing;
        }
        match token.parse() {
            Ok(n) => LineNumber::Number(n),
            Err(_) => LineNumber::Malformed(token.to_string()),
        }
    }

    /// Sort key: numbered lines first, in ascending order.
    pub fn number(&self) -> Option<usize> {
        match self {
            LineNumber::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// A single diagnostic reported by a checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// File the diagnostic is attributed to. For special findings this is the
    /// first whitespace-delimited token of the raw line.
    pub file: String,
    pub line: LineNumber,
    /// `None` for special findings.
    pub level: Option<Level>,
    pub code: Option<String>,
    pub message: Vec<String>,
    /// Human readable meaning of `code`, when the code table knows it.
    pub description: Option<String>,
}

impl Finding {
    /// A line that did not match the checker's grammar, kept verbatim.
    pub fn special(line: &str) -> Self {
        let key = line.split_whitespace().next().unwrap_or_default();
        Self {
            file: key.to_string(),
            line: LineNumber::Missing,
            level: None,
            code: None,
            message: vec![line.to_string()],
            description: None,
        }
    }

    pub fn is_special(&self) -> bool {
        self.level.is_none()
    }

    /// Message parts followed by the description.
    pub fn detail(&self) -> String {
        self.message
            .iter()
            .map(String::as_str)
            .chain(self.description.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Per-severity counters for the four known severities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub info: usize,
    pub minor: usize,
    pub major: usize,
    pub fatal: usize,
}

impl SeverityCounts {
    pub fn increment(&mut self, severity: Severity) {
        *self.slot(severity) += 1;
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Info => self.info,
            Severity::Minor => self.minor,
            Severity::Major => self.major,
            Severity::Fatal => self.fatal,
        }
    }

    pub fn total(&self) -> usize {
        self.info + self.minor + self.major + self.fatal
    }

    pub fn merge(&mut self, other: &SeverityCounts) {
        for severity in Severity::ALL {
            *self.slot(severity) += other.get(severity);
        }
    }

    fn slot(&mut self, severity: Severity) -> &mut usize {
        match severity {
            Severity::Info => &mut self.info,
            Severity::Minor => &mut self.minor,
            Severity::Major => &mut self.major,
            Severity::Fatal => &mut self.fatal,
        }
    }
}

/// Output of one checker invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub severity_counts: SeverityCounts,
    pub findings: Vec<Finding>,
}

/// A checker's result labelled for the report.
#[derive(Debug, Clone, Serialize)]
pub struct CheckerOutcome {
    /// Short name used in tallies, e.g. "C".
    pub name: String,
    /// Section heading, e.g. "C Style results".
    pub title: String,
    pub result: CheckResult,
}
