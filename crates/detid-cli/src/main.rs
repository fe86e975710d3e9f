//! # detid CLI entry point
//!
//! Parses command-line arguments, resolves configuration, and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use detid_cli::config::CliConfig;
use detid_cli::fingerprint::{run_fingerprint, FingerprintArgs};
use detid_cli::fpi::{run_fpi, FpiArgs};
use detid_cli::key::{run_key, KeyArgs};
use detid_cli::named::{run_uuid, UuidArgs};
use detid_cli::random::{run_random, RandomArgs};
use detid_cli::sequence::{run_sequence, SequenceArgs};

/// Deterministic identifiers, fingerprints, and composite cache keys.
#[derive(Parser, Debug)]
#[command(name = "detid", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Derive name-based UUIDs (v3, v5, v8).
    Uuid(UuidArgs),

    /// Generate random v4 UUIDs.
    Random(RandomArgs),

    /// Issue sequential identifiers, reissuing released values first.
    Sequence(SequenceArgs),

    /// Fingerprint a JSON document.
    Fingerprint(FingerprintArgs),

    /// Parse and check Formal Public Identifiers.
    Fpi(FpiArgs),

    /// Build a composite cache key over JSON records.
    Key(KeyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = CliConfig::load(cli.config.as_deref())
        .map(CliConfig::with_process_env)
        .and_then(|config| match cli.command {
            Commands::Uuid(args) => run_uuid(&args, &config),
            Commands::Random(args) => run_random(&args),
            Commands::Sequence(args) => run_sequence(&args),
            Commands::Fingerprint(args) => run_fingerprint(&args, &config),
            Commands::Fpi(args) => run_fpi(&args),
            Commands::Key(args) => run_key(&args),
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
