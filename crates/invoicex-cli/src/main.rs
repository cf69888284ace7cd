// SPDX-License-Identifier: MIT OR Apache-2.0
//! `invoicex` — the thin CLI driver for the invoice exception-handling
//! pipeline (spec.md §6.6, extended by the expanded spec's
//! `process-batch` and `clear-logs` subcommands, §4.10–§4.11).

#![deny(unsafe_code)]

mod commands;
mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use format::OutputFormat;
use invoicex_config::{load_config, validate_config, RepoConfig};
use tracing_subscriber::EnvFilter;

/// Exit code for a fatal infrastructure error (spec.md §6.6: "non-zero
/// only for infrastructure errors").
const EXIT_INFRASTRUCTURE_ERROR: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "invoicex", version, about = "Invoice exception-handling pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a `RepoConfig` TOML file. Defaults to the programmatic
    /// default config (current directory, calibrated thresholds).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the configured repo root for this invocation.
    #[arg(long, global = true)]
    root: Option<String>,

    /// Enable verbose (debug-level) logging.
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process a single invoice filename through the full pipeline.
    Process {
        /// Bare invoice filename or path, resolved against the document store.
        filename: String,

        /// Output format.
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Process every `*.json` file in a directory (spec.md §4.10).
    ProcessBatch {
        /// Directory of invoice JSON files.
        dir: PathBuf,

        /// Output format for each per-invoice line.
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Truncate every `system_logs/*.log` file to zero bytes (spec.md §4.11).
    ClearLogs,
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn resolve_config(cli: &Cli) -> anyhow::Result<RepoConfig> {
    let mut config = load_config(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;
    if let Some(root) = &cli.root {
        config.repo_root = Some(root.clone());
    }
    let warnings = validate_config(&config)
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;
    for warning in warnings {
        tracing::debug!(%warning, "config warning");
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = match resolve_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(EXIT_INFRASTRUCTURE_ERROR);
        }
    };

    let exit_code = match &cli.command {
        Commands::Process { filename, format } => run_process(filename, format, &config),
        Commands::ProcessBatch { dir, format } => run_process_batch(dir, format, &config),
        Commands::ClearLogs => run_clear_logs(&config),
    };
    std::process::exit(exit_code);
}

fn parse_format(s: &str) -> OutputFormat {
    s.parse().unwrap_or_else(|e: String| {
        eprintln!("Warning: {e}; falling back to text");
        OutputFormat::Text
    })
}

fn run_process(filename: &str, format: &str, config: &RepoConfig) -> i32 {
    match commands::process_invoice(filename, config) {
        Ok(outcome) => {
            println!("{}", format::format_outcome(&outcome, parse_format(format)));
            0
        }
        Err(err) => {
            eprintln!("Error: {err}");
            EXIT_INFRASTRUCTURE_ERROR
        }
    }
}

fn run_process_batch(dir: &std::path::Path, format: &str, config: &RepoConfig) -> i32 {
    let output_format = parse_format(format);
    let (items, counts) = commands::process_batch(dir, config);
    for item in &items {
        match output_format {
            OutputFormat::Text => println!("{}", format::format_batch_item_line(item)),
            OutputFormat::Json => {
                if let Ok(outcome) = &item.result {
                    println!("{}", format::format_outcome_json(outcome));
                } else {
                    println!("{}", format::format_batch_item_line(item));
                }
            }
        }
    }
    println!("{}", format::format_batch_counts(&counts));
    0
}

fn run_clear_logs(config: &RepoConfig) -> i32 {
    match commands::clear_logs(config) {
        Ok(paths) => {
            for path in paths {
                println!("cleared: {}", path.display());
            }
            0
        }
        Err(err) => {
            eprintln!("Error: {err}");
            EXIT_INFRASTRUCTURE_ERROR
        }
    }
}
