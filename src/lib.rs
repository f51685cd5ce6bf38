//! Coding style aggregation for C and Haskell projects.
//!
//! `plum` resolves the paths to skip, runs vera++ and lambdananas over the
//! rest, and folds their diagnostics into one report with a pass/fail verdict.

/// Module containing the core analyzer logic.
/// This includes the `Plum` struct that runs every checker over a project.
pub mod analyzer;

/// Module containing the external checkers (C and Haskell coding style).
pub mod checkers;

/// Module containing the rule code description table.
pub mod code_table;

/// Module defining the run configuration and its `plum.toml` loader.
pub mod config;

/// Module containing the chunked, concurrent dispatch of files to checkers.
pub mod dispatch;

/// Module defining the error type shared by the library.
pub mod error;

/// Module resolving ignored paths from git and `.plumignore`.
pub mod ignore_set;

/// Module defining the diagnostic data structures.
/// This includes `Severity`, `Finding` and `CheckResult`.
pub mod model;

/// Module containing the parsers for checker output.
pub mod parser;

/// Module rendering the final report and verdict.
pub mod report;

/// Module containing tracing setup.
pub mod telemetry;

/// Module containing the file tree walker.
pub mod walker;
