//! CLI entrypoint for the platshim harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use platshim_abi::config::{self, LogFormat};
use platshim_harness::structured_log::{LogEmitter, validate_log_file};
use platshim_harness::{ConstantsReport, HarnessError, run_probe};

/// Host-side tooling for platshim.
#[derive(Debug, Parser)]
#[command(name = "platshim-harness")]
#[command(about = "Constants report, live probe and log validation for platshim")]
struct Cli {
    /// Format for fatal narrowing records (overrides `PLATSHIM_LOG`).
    #[arg(long, global = true, value_enum)]
    log_format: Option<FatalFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FatalFormat {
    Json,
    Text,
    Off,
}

impl From<FatalFormat> for LogFormat {
    fn from(f: FatalFormat) -> Self {
        match f {
            FatalFormat::Json => Self::Json,
            FatalFormat::Text => Self::Text,
            FatalFormat::Off => Self::Off,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every exported constant for this target as JSON.
    Constants {
        /// Output JSON path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Exercise clock, rusage, readdir and fstatat against a directory.
    Probe {
        /// Directory to scan.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Structured JSONL log path (if omitted, logs go to stdout).
        #[arg(long)]
        log: Option<PathBuf>,
        /// Run id embedded in every trace id.
        #[arg(long, default_value = "probe")]
        run_id: String,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        /// JSONL file to check.
        path: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if let Some(format) = cli.log_format {
        config::set_log_format(format.into());
    }

    match cli.command {
        Command::Constants { output } => {
            let json = ConstantsReport::collect().to_json()?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json + "\n")?;
                    eprintln!("Wrote constants report to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Command::Probe { dir, log, run_id } => {
            let report = match log {
                Some(path) => {
                    let mut emitter = LogEmitter::to_file(&path, &run_id)?;
                    let report = run_probe(&dir, &mut emitter)?;
                    eprintln!("Wrote probe log to {}", path.display());
                    report
                }
                None => run_probe(&dir, &mut LogEmitter::to_stdout(&run_id))?,
            };
            let mismatched: Vec<&str> = report
                .entries
                .iter()
                .filter(|e| !e.inode_consistent())
                .map(|e| e.name.as_str())
                .collect();
            eprintln!(
                "Probed {} entries in {}; {} inode mismatches",
                report.entries.len(),
                dir.display(),
                mismatched.len()
            );
            // Mount points legitimately differ: readdir sees the covered inode.
            if !mismatched.is_empty() {
                eprintln!("inode mismatches (mount points?): {mismatched:?}");
            }
        }
        Command::ValidateLog { path } => {
            let (total, errors) = validate_log_file(&path)?;
            for err in &errors {
                eprintln!("{err}");
            }
            if !errors.is_empty() {
                let invalid = errors
                    .iter()
                    .map(|e| e.line_number)
                    .collect::<std::collections::BTreeSet<_>>()
                    .len();
                return Err(HarnessError::InvalidLog { total, invalid }.into());
            }
            eprintln!("{total} log lines valid");
        }
    }

    Ok(())
}
