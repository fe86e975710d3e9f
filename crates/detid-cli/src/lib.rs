//! # detid-cli — Command-Line Interface for detid
//!
//! Thin clap front end over `detid-core` and `detid-keys`. Each subcommand
//! module pairs an argument struct with a `run_*` handler that prints its
//! results and returns the process exit code.
//!
//! ## Subcommands
//!
//! - `detid uuid`: Name-based UUIDs (v3, v5, v8).
//! - `detid random`: Random v4 UUIDs.
//! - `detid sequence`: Sequential identifiers with a reuse pool.
//! - `detid fingerprint`: Content fingerprints of JSON documents.
//! - `detid fpi`: Formal Public Identifier parsing and checking.
//! - `detid key`: Composite cache keys over JSON records.
//!
//! ```bash
//! detid uuid --namespace dns www.example.com
//! detid fpi parse "-//W3C//DTD HTML 4.01//EN"
//! detid key orders.json --select id,customer --binary
//! ```

pub mod config;
pub mod fingerprint;
pub mod fpi;
pub mod key;
pub mod named;
pub mod random;
pub mod sequence;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a whole input file, or standard input when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read standard input")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read and parse a JSON input file, or standard input when `path` is `-`.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = read_input(path)?;
    serde_json::from_str(&content).with_context(|| format!("{} is not valid JSON", path.display()))
}
