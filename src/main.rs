use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use notestrip::{logger, run, ScanOptions, StripRules};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Strip trainee annotation comment blocks from TypeScript and JavaScript sources",
    long_about = None
)]
struct Args {
    /// Directory to scan (defaults to current directory)
    #[arg(default_value = ".", env = "NOTESTRIP_ROOT")]
    root: PathBuf,

    /// TOML file overriding extensions, ignored directories or the sentinel phrase
    #[arg(long, short, env = "NOTESTRIP_CONFIG")]
    config: Option<PathBuf>,

    /// Abort on the first unreadable, undecodable or unwritable file
    #[arg(long)]
    fail_fast: bool,

    /// Log every file that gets rewritten
    #[arg(long, short)]
    verbose: bool,
}

/// Exit code when the scan finished but some files were skipped
const EXIT_PARTIAL: u8 = 2;

fn strip(args: &Args) -> Result<ExitCode> {
    let rules = StripRules::load(args.config.as_deref())?;

    let options = ScanOptions {
        fail_fast: args.fail_fast,
        show_progress: std::io::stderr().is_terminal(),
    };

    let summary = run(&args.root, &rules, options)
        .with_context(|| format!("Failed to strip annotations under {}", args.root.display()))?;

    println!("{}", summary);

    if summary.failed > 0 {
        eprintln!(
            "{}",
            format!("Failed to process {} files.", summary.failed).red()
        );
        return Ok(ExitCode::from(EXIT_PARTIAL));
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    if let Err(err) = logger::init_logger(level) {
        eprintln!("Warning: could not initialize logger: {}", err);
    }

    match strip(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
