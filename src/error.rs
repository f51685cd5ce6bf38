//! Error types for the checking pipeline.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    ToolFailed { program: String, status: ExitStatus },

    #[error("failed to read code table {path}: {source}")]
    CodeTableRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid line {line_no} in code table {path}: {line}")]
    CodeTable {
        path: PathBuf,
        line_no: usize,
        line: String,
    },

    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for checking operations
pub type Result<T> = std::result::Result<T, CheckError>;
