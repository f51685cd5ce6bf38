use anyhow::{Context, Result};
use clap::Parser;
use plum_rs::analyzer::Plum;
use plum_rs::checkers::c_style::CStyleChecker;
use plum_rs::checkers::haskell_style::HaskellStyleChecker;
use plum_rs::checkers::Checker;
use plum_rs::code_table::CodeTable;
use plum_rs::config::Config;
use plum_rs::dispatch::hardware_parallelism;
use plum_rs::model::CheckerOutcome;
use plum_rs::report::{self, Theme};
use plum_rs::telemetry;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Command line interface configuration using `clap`.
#[derive(Parser)]
#[command(author, version, about = "Coding style checker for C and Haskell projects", long_about = None)]
struct Cli {
    /// Root of the project to check.
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Do not ignore files listed by git or .plumignore.
    #[arg(long)]
    no_ignore: bool,

    /// Always exit with status 0, even when errors are found.
    #[arg(long)]
    no_status: bool,

    /// Print the results as JSON instead of the colored report.
    #[arg(long)]
    json: bool,

    /// Configuration file (defaults to plum.toml in the project root).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Show debug logs on stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    has_errors: bool,
    checkers: &'a [CheckerOutcome],
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose);

    let config = Config::discover(&cli.path, cli.config.as_deref())?;

    // Only the C checker needs rule descriptions.
    let table = if config.c_style.enabled {
        CodeTable::load(&config.code_table).context("cannot describe C style rules")?
    } else {
        CodeTable::default()
    };

    let mut checkers: Vec<Box<dyn Checker + '_>> = Vec::new();
    if config.c_style.enabled {
        let mut checker =
            CStyleChecker::new(config.c_style.command(), &table, hardware_parallelism());
        checker.excludes = config.c_style.excludes.clone();
        checkers.push(Box::new(checker));
    }
    if config.haskell_style.enabled {
        let mut checker = HaskellStyleChecker::new(config.haskell_style.command());
        checker.excludes = config.haskell_style.excludes.clone();
        checkers.push(Box::new(checker));
    }

    let plum = Plum::new(checkers, config.ignore_file.clone(), !cli.no_ignore);
    let outcomes = plum.analyze(&cli.path)?;

    let has_errors = if cli.json {
        let has_errors = report::has_errors(&outcomes);
        let json = JsonReport {
            has_errors,
            checkers: &outcomes,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
        has_errors
    } else {
        let report = report::render(&outcomes, &Theme::default());
        print!("{}", report.text);
        report.has_errors
    };

    if has_errors && !cli.no_status {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
