use crate::error::{CheckError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Human readable descriptions of checker rule codes, e.g. `C-O1`.
///
/// Loaded once from a `code:description` file and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    descriptions: HashMap<String, String>,
}

impl CodeTable {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CheckError::CodeTableRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parses table content; `origin` is only used in error messages.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        let mut descriptions = HashMap::new();
        let content = content.trim_end_matches(['\n', '\r']);
        if content.is_empty() {
            return Ok(Self { descriptions });
        }
        for (idx, line) in content.lines().enumerate() {
            let parts: Vec<&str> = line.split(':').collect();
            let [code, description] = parts.as_slice() else {
                return Err(CheckError::CodeTable {
                    path: origin.to_path_buf(),
                    line_no: idx + 1,
                    line: line.to_string(),
                });
            };
            descriptions.insert(code.to_string(), description.to_string());
        }
        Ok(Self { descriptions })
    }

    pub fn describe(&self, code: &str) -> Option<&str> {
        self.descriptions.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            descriptions: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
