//! Source line counter
//!
//! Walks a directory tree and classifies every line of each recognised source
//! file as empty, comment or code, then prints totals per language.
//!
//! Supported languages: Python, JavaScript, TypeScript, Java, C/C++, Solidity, Vue.

mod aggregate;
mod classify;
mod error;
mod language;
mod metrics;
mod report;
mod scan;

use std::ffi::OsString;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use colored::*;

use crate::error::ScanError;
use crate::metrics::PerformanceMetrics;
use crate::scan::ScanConfig;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Count empty, comment and code lines per language",
    long_about = "Supported languages: Python, JavaScript, TypeScript, Java, C/C++, Solidity, Vue. \
                  The directories venv, .git, __pycache__ and node_modules are always skipped."
)]
struct Args {
    #[arg(default_value = ".")]
    path: String,

    /// Additional directory names to skip
    #[arg(short, long, action = ArgAction::Append)]
    ignore: Vec<String>,

    /// Print statistics for every file
    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long, default_value = "1000000")]
    max_entries: usize,

    #[arg(short = 'd', long, default_value = "100")]
    max_depth: usize,

    #[arg(short = 'n', long)]
    non_recursive: bool,

    /// Glob matched against file names and root-relative paths
    #[arg(short = 'f', long)]
    filespec: Option<String>,

    /// List supported languages and exit
    #[arg(short = 'l', long)]
    languages: bool,
}

impl From<&Args> for ScanConfig {
    fn from(args: &Args) -> Self {
        let mut config = ScanConfig::new(&args.path).exclude(args.ignore.iter().cloned());
        config.max_entries = args.max_entries;
        config.max_depth = args.max_depth;
        config.non_recursive = args.non_recursive;
        config.filespec = args.filespec.clone();
        config.verbose = args.verbose;
        config
    }
}

fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn run_with_args<I, T>(args: I, metrics: &mut PerformanceMetrics) -> Result<(), ScanError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::parse_from(args);

    if args.languages {
        print!("{}", report::build_language_list());
        return Ok(());
    }

    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_yellow()
    );
    println!("Starting source code analysis...");

    let config = ScanConfig::from(&args);
    let outcome = scan::scan(&config, metrics)?;
    metrics.print_final_stats();
    print!("{}", report::build_analysis_report(&outcome));
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    let mut metrics = PerformanceMetrics::new();
    match run_with_args(std::env::args_os(), &mut metrics) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {}", "Error".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
