//! # UUID Subcommand
//!
//! Derives name-based UUIDs. The namespace and hash algorithm default to
//! the configured values (see [`crate::config`]).
//!
//! ```bash
//! detid uuid www.example.com                     # v5 in the DNS namespace
//! detid uuid --hash md5 www.example.com          # v3
//! detid uuid --namespace text:orders --hash sha256 1001 1002
//! ```

use anyhow::{Context, Result};
use clap::Args;
use uuid::Uuid;

use detid_core::NamespaceHashGenerator;

use crate::config::CliConfig;

/// Arguments for the `detid uuid` subcommand.
#[derive(Args, Debug)]
pub struct UuidArgs {
    /// Namespace: dns, url, oid, x500, a UUID, or text:<value>.
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Hash algorithm: md5 (v3), sha1 (v5), or sha256 (v8).
    #[arg(long)]
    pub hash: Option<String>,

    /// Names to derive identifiers for.
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Derive one UUID per name, in argument order.
pub fn derive_uuids(args: &UuidArgs, config: &CliConfig) -> Result<Vec<Uuid>> {
    let namespace = config.namespace(args.namespace.as_deref())?;
    let algorithm = config.hash(args.hash.as_deref())?;
    tracing::debug!(%namespace, %algorithm, "deriving name-based identifiers");
    let generator = NamespaceHashGenerator::new(namespace, algorithm);
    args.names
        .iter()
        .map(|name| {
            generator
                .derive(name)
                .with_context(|| format!("cannot derive identifier for {name:?}"))
        })
        .collect()
}

/// Execute the uuid subcommand.
pub fn run_uuid(args: &UuidArgs, config: &CliConfig) -> Result<u8> {
    for id in derive_uuids(args, config)? {
        println!("{id}");
    }
    Ok(0)
}
