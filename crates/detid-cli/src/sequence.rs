//! # Sequence Subcommand
//!
//! Demonstrates the reusable sequential generator: values passed with
//! `--reuse` are released into the pool first and reissued before the
//! counter advances.
//!
//! ```bash
//! detid sequence --seed 100 --count 3            # 101 102 103
//! detid sequence --count 3 --reuse 7 --reuse 7   # 7 1 2
//! ```

use anyhow::{Context, Result};
use clap::Args;

use detid_core::{IdentifierGenerator, ReusableGenerator, SequentialGenerator};

/// Arguments for the `detid sequence` subcommand.
#[derive(Args, Debug)]
pub struct SequenceArgs {
    /// Counter start; the first issued value is `seed + 1`.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub seed: i64,

    /// Number of identifiers to print.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,

    /// Released values to reissue first (repeatable).
    #[arg(long, allow_negative_numbers = true)]
    pub reuse: Vec<i64>,
}

/// Issue `args.count` values.
pub fn issue(args: &SequenceArgs) -> Result<Vec<i64>> {
    let mut generator = SequentialGenerator::with_seed(args.seed);
    for &value in &args.reuse {
        generator.reuse(value);
    }
    (0..args.count)
        .map(|_| generator.next_id().context("sequence cannot advance"))
        .collect()
}

/// Execute the sequence subcommand.
pub fn run_sequence(args: &SequenceArgs) -> Result<u8> {
    for value in issue(args)? {
        println!("{value}");
    }
    Ok(0)
}
