// In: src/main.rs

//! CLI entry point: `nullsieve <null_lexicon_path> <csv_path> <rows>`.
//!
//! Thin glue around the library: argument validation, file opening, and
//! exit-code mapping. Exit codes are 0 on success, 2 on bad usage, 3 on
//! resource failures (unopenable files, bad capacities), 4 on CSV parse
//! errors. The report is printed only after the whole run has succeeded.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;

use nullsieve::{scan_csv, DetectorConfig, NullDetector, NullLexicon, SieveError};

#[derive(Parser, Debug)]
#[command(name = "nullsieve", version = nullsieve::VERSION)]
#[command(about = "Flags probable null-placeholder tokens hiding in CSV columns")]
struct Cli {
    /// Word list of known null-equivalent phrases, one per line.
    null_lexicon_path: PathBuf,

    /// CSV file to scan (first row is treated as the header).
    csv_path: PathBuf,

    /// Declared total row count; sizes the tables and is the probability
    /// denominator.
    declared_row_count: u64,

    /// Optional JSON file overriding the detection heuristics.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> Result<DetectorConfig, SieveError> {
    match &cli.config {
        Some(path) => {
            let file = File::open(path)?;
            Ok(serde_json::from_reader(BufReader::new(file))?)
        }
        None => Ok(DetectorConfig::default()),
    }
}

fn run(cli: &Cli) -> Result<(), SieveError> {
    if cli.declared_row_count == 0 {
        return Err(SieveError::Usage(
            "declared row count must be at least 1".to_string(),
        ));
    }

    let config = Arc::new(load_config(cli)?);
    let lexicon = NullLexicon::load(&cli.null_lexicon_path, config.lexicon_capacity)?;
    log::info!(
        "scanning {} with {} lexicon phrase(s), {} declared row(s)",
        cli.csv_path.display(),
        lexicon.len(),
        cli.declared_row_count
    );

    let mut detector = NullDetector::new(&lexicon, cli.declared_row_count, Arc::clone(&config));
    let csv_file = BufReader::new(File::open(&cli.csv_path)?);
    scan_csv(csv_file, &mut detector)?;
    detector.finalize()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    detector.report()?.write_to(&mut out)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
