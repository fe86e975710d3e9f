//! # Fingerprint Subcommand
//!
//! Fingerprints a JSON document by its canonical (RFC 8785) serialization,
//! so documents that differ only in key order or whitespace share a
//! fingerprint.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use detid_core::{CanonicalJson, Fingerprint, FingerprintGenerator, NamespaceHashGenerator};

use crate::config::CliConfig;
use crate::read_json;

/// Arguments for the `detid fingerprint` subcommand.
#[derive(Args, Debug)]
pub struct FingerprintArgs {
    /// JSON document to fingerprint (`-` for standard input).
    pub file: PathBuf,
}

/// Fingerprint the JSON document at `path`.
pub fn fingerprint_file(path: &Path, config: &CliConfig) -> Result<Fingerprint> {
    let document = read_json(path)?;
    let generator = FingerprintGenerator::with_parts(
        CanonicalJson,
        NamespaceHashGenerator::v5(config.fingerprint_namespace()?),
    );
    generator
        .fingerprint(&document)
        .with_context(|| format!("cannot fingerprint {}", path.display()))
}

/// Execute the fingerprint subcommand.
pub fn run_fingerprint(args: &FingerprintArgs, config: &CliConfig) -> Result<u8> {
    let fingerprint = fingerprint_file(&args.file, config)?;
    println!("{fingerprint}");
    Ok(0)
}
