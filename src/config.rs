//! Run configuration.
//!
//! Defaults match a standard installation: vera++ with the `epitech` profile,
//! lambdananas in vera output mode, and the rule descriptions shipped with
//! the vera++ rules. A `plum.toml` in the project root (or `--config`)
//! overrides any of them.

use crate::checkers::{c_style, haskell_style};
use crate::dispatch::ToolCommand;
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the project root when no `--config` is given.
pub const CONFIG_FILE: &str = "plum.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Project-local ignore file, relative to the project root.
    pub ignore_file: String,
    /// `code:description` table for vera++ rule codes.
    pub code_table: PathBuf,
    #[serde(deserialize_with = "c_style_table")]
    pub c_style: ToolConfig,
    #[serde(deserialize_with = "haskell_style_table")]
    pub haskell_style: ToolConfig,
}

/// One external checker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolConfig {
    pub enabled: bool,
    pub program: String,
    pub args: Vec<String>,
    /// Paths always excluded for this checker.
    pub excludes: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ToolConfig {
    /// vera++ with the `epitech` profile, reading file names on stdin.
    pub fn c_style() -> Self {
        Self {
            enabled: true,
            program: "vera++".to_string(),
            args: owned(&["--profile", "epitech", "-d"]),
            excludes: owned(&c_style::DEFAULT_EXCLUDES),
        }
    }

    /// lambdananas in vera output mode.
    pub fn haskell_style() -> Self {
        Self {
            enabled: true,
            program: "lambdananas".to_string(),
            args: owned(&["-o", "vera"]),
            excludes: owned(&haskell_style::DEFAULT_EXCLUDES),
        }
    }

    pub fn command(&self) -> ToolCommand {
        ToolCommand::new(self.program.clone(), self.args.clone())
    }
}

/// Fields set in a `[c_style]` or `[haskell_style]` table. Anything left out
/// keeps that tool's default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ToolTable {
    enabled: Option<bool>,
    program: Option<String>,
    args: Option<Vec<String>>,
    excludes: Option<Vec<String>>,
}

impl ToolTable {
    fn over(self, base: ToolConfig) -> ToolConfig {
        ToolConfig {
            enabled: self.enabled.unwrap_or(base.enabled),
            program: self.program.unwrap_or(base.program),
            args: self.args.unwrap_or(base.args),
            excludes: self.excludes.unwrap_or(base.excludes),
        }
    }
}

fn c_style_table<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<ToolConfig, D::Error> {
    Ok(ToolTable::deserialize(deserializer)?.over(ToolConfig::c_style()))
}

fn haskell_style_table<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<ToolConfig, D::Error> {
    Ok(ToolTable::deserialize(deserializer)?.over(ToolConfig::haskell_style()))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_file: ".plumignore".to_string(),
            code_table: PathBuf::from("/usr/local/lib/vera++/code_to_comment"),
            c_style: ToolConfig::c_style(),
            haskell_style: ToolConfig::haskell_style(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse '{}'", path.display()))?;
        Ok(config)
    }

    /// Loads `explicit` when given, else `plum.toml` under `root` if it
    /// exists, else the defaults.
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = root.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
