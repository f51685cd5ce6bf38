//! Fan-out of checker work to concurrent subprocesses.
//!
//! The included files are cut into contiguous chunks, every chunk is handed
//! to its own task, and results are gathered back in submission order so the
//! same input always produces the same output.

use crate::error::{CheckError, Result};
use rayon::prelude::*;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// Number of hardware threads, or 1 when it cannot be determined.
pub fn hardware_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// How a file list is split across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub workers: usize,
    pub chunk_size: usize,
}

impl ChunkPlan {
    /// Aims for at least five files per worker and leaves one hardware
    /// thread free.
    pub fn new(file_count: usize, parallelism: usize) -> Self {
        let workers = (file_count / 5)
            .min(parallelism.saturating_sub(1))
            .max(1);
        let chunk_size = (file_count / workers).max(1);
        Self {
            workers,
            chunk_size,
        }
    }

    /// Contiguous chunks of `chunk_size`; the last one may be shorter, and
    /// there can be more chunks than workers.
    pub fn split<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        items.chunks(self.chunk_size).collect()
    }
}

/// Runs every task at once and returns their results in submission order.
///
/// The caller blocks until all tasks are done. Each task gets its own thread
/// so blocking tasks (subprocesses) never wait on each other. The first
/// error is returned and no partial results are kept.
pub fn join_all<I, T, F>(inputs: Vec<I>, task: F) -> Result<Vec<T>>
where
    I: Send,
    T: Send,
    F: Fn(I) -> Result<T> + Sync + Send,
{
    if inputs.is_empty() {
        return Ok(Vec::new());
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(inputs.len())
        .build()?;
    pool.install(|| inputs.into_par_iter().map(&task).collect())
}

/// Something that checks a chunk of files and returns the raw diagnostics.
pub trait ChunkRunner: Sync {
    fn run(&self, chunk: &[String]) -> Result<String>;
}

impl<F> ChunkRunner for F
where
    F: Fn(&[String]) -> Result<String> + Sync,
{
    fn run(&self, chunk: &[String]) -> Result<String> {
        self(chunk)
    }
}

/// Checks `files` chunk by chunk and returns the non-empty output lines.
pub fn dispatch<R: ChunkRunner + ?Sized>(
    files: &[String],
    runner: &R,
    parallelism: usize,
) -> Result<Vec<String>> {
    let plan = ChunkPlan::new(files.len(), parallelism);
    let chunks = plan.split(files);
    debug!(
        files = files.len(),
        workers = plan.workers,
        chunk_size = plan.chunk_size,
        chunks = chunks.len(),
        "dispatching chunks"
    );

    let outputs = join_all(chunks, |chunk| runner.run(chunk))?;
    Ok(outputs
        .iter()
        .flat_map(|output| output.lines())
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// An external checker command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new<S: Into<String>>(program: S, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Runs the command in `cwd` with extra trailing arguments, feeding
    /// `stdin` when given, and returns its stdout.
    ///
    /// Stderr is passed through to the terminal. A non-zero exit is an error.
    pub fn run(&self, cwd: &Path, extra_args: &[String], stdin: Option<&str>) -> Result<String> {
        debug!(program = %self.program, args = ?self.args, extra = extra_args.len(), "running checker");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .args(extra_args)
            .current_dir(cwd)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| CheckError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from a separate thread so a chatty child cannot fill its
        // stdout pipe while we are still writing.
        let writer = match (stdin, child.stdin.take()) {
            (Some(input), Some(mut pipe)) => {
                let input = input.to_string();
                Some(std::thread::spawn(move || pipe.write_all(input.as_bytes())))
            }
            _ => None,
        };

        let output = child.wait_with_output().map_err(|source| CheckError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if let Some(writer) = writer {
            finish_stdin_writer(&self.program, writer);
        }

        if !output.status.success() {
            return Err(CheckError::ToolFailed {
                program: self.program.clone(),
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Waits for a stdin feeding thread and reports how it ended.
///
/// A broken pipe only means the child exited without reading everything; it
/// is then judged by its exit status alone. Other failures leave the child
/// with a truncated input and are logged.
pub(crate) fn finish_stdin_writer(program: &str, writer: JoinHandle<std::io::Result<()>>) {
    match writer.join() {
        Ok(Ok(())) => {}
        Ok(Err(err)) if err.kind() == ErrorKind::BrokenPipe => {
            debug!(program, "child closed its input early");
        }
        Ok(Err(err)) => warn!(program, error = %err, "failed to write child input"),
        Err(_) => warn!(program, "child input writer panicked"),
    }
}

/// Feeds each chunk, newline-separated, to a command's stdin.
pub struct StdinRunner<'a> {
    pub command: &'a ToolCommand,
    pub cwd: &'a Path,
}

impl ChunkRunner for StdinRunner<'_> {
    fn run(&self, chunk: &[String]) -> Result<String> {
        self.command.run(self.cwd, &[], Some(&chunk.join("\n")))
    }
}
