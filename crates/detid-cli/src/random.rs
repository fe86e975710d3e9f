//! # Random Subcommand
//!
//! Prints version-4 UUIDs drawn from the operating system's CSPRNG.

use anyhow::Result;
use clap::Args;
use uuid::Uuid;

use detid_core::{IdentifierGenerator, RandomGenerator};

/// Arguments for the `detid random` subcommand.
#[derive(Args, Debug)]
pub struct RandomArgs {
    /// Number of identifiers to print.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,
}

/// Generate `args.count` random identifiers.
pub fn generate(args: &RandomArgs) -> Result<Vec<Uuid>> {
    let mut generator = RandomGenerator::new();
    let ids = (0..args.count)
        .map(|_| generator.next_id())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Execute the random subcommand.
pub fn run_random(args: &RandomArgs) -> Result<u8> {
    for id in generate(args)? {
        println!("{id}");
    }
    Ok(0)
}
