//! # FPI Subcommand
//!
//! - `parse`: Print the fields of one Formal Public Identifier as JSON.
//! - `check`: Validate several FPIs; exits 1 if any is malformed.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use detid_core::{ApprovalStatus, Fpi};

/// Arguments for the `detid fpi` subcommand.
#[derive(Args, Debug)]
pub struct FpiArgs {
    #[command(subcommand)]
    pub command: FpiCommand,
}

/// FPI subcommands.
#[derive(Subcommand, Debug)]
pub enum FpiCommand {
    /// Parse one FPI and print its fields.
    Parse {
        /// FPI text, e.g. "-//W3C//DTD HTML 4.01//EN".
        text: String,
    },

    /// Check that each argument is a well-formed FPI.
    Check {
        /// FPI texts.
        #[arg(required = true)]
        texts: Vec<String>,
    },
}

/// Execute the fpi subcommand.
pub fn run_fpi(args: &FpiArgs) -> Result<u8> {
    match &args.command {
        FpiCommand::Parse { text } => {
            let fields = describe(text)?;
            println!("{}", serde_json::to_string_pretty(&fields)?);
            Ok(0)
        }
        FpiCommand::Check { texts } => {
            let mut failures = 0usize;
            for text in texts {
                match check(text) {
                    Ok(()) => println!("OK       {text}"),
                    Err(reason) => {
                        failures += 1;
                        println!("INVALID  {text}: {reason}");
                    }
                }
            }
            tracing::info!(checked = texts.len(), failures, "fpi check finished");
            Ok(u8::from(failures > 0))
        }
    }
}

/// The fields of an FPI as a JSON object.
pub fn describe(text: &str) -> Result<serde_json::Value> {
    let fpi = Fpi::parse(text).with_context(|| format!("cannot parse FPI {text:?}"))?;
    let status = match fpi.status() {
        ApprovalStatus::None => "none",
        ApprovalStatus::Informal => "informal",
        ApprovalStatus::Standard(_) => "standard",
    };
    Ok(json!({
        "status": status,
        "reference": fpi.reference(),
        "author": fpi.author(),
        "product": fpi.product(),
        "description": fpi.description(),
        "language": fpi.language(),
        "canonical": fpi.to_string(),
    }))
}

fn check(text: &str) -> Result<(), String> {
    Fpi::parse(text).map(|_| ()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_unregistered() {
        let fields = describe("-//W3C//DTD HTML 4.01//EN").unwrap();
        assert_eq!(fields["status"], "none");
        assert_eq!(fields["reference"], serde_json::Value::Null);
        assert_eq!(fields["author"], "W3C");
        assert_eq!(fields["product"], "DTD");
        assert_eq!(fields["description"], "HTML 4.01");
        assert_eq!(fields["language"], "EN");
        assert_eq!(fields["canonical"], "-//W3C//DTD HTML 4.01//EN");
    }

    #[test]
    fn describe_standard() {
        let fields = describe("ISO 8879:1986//ACME//ENTITIES Added Latin 1//EN").unwrap();
        assert_eq!(fields["status"], "standard");
        assert_eq!(fields["reference"], "ISO 8879:1986");
        assert_eq!(fields["product"], "ENTITIES");
    }

    #[test]
    fn describe_rejects_malformed() {
        let err = describe("not an fpi").unwrap_err();
        assert!(format!("{err:#}").contains("not an fpi"));
    }

    #[test]
    fn check_exit_code() {
        let ok = FpiArgs {
            command: FpiCommand::Check {
                texts: vec!["+//ACME//DTD Widget//EN".into()],
            },
        };
        assert_eq!(run_fpi(&ok).unwrap(), 0);
        let bad = FpiArgs {
            command: FpiCommand::Check {
                texts: vec!["+//ACME//DTD Widget//EN".into(), "garbage".into()],
            },
        };
        assert_eq!(run_fpi(&bad).unwrap(), 1);
    }
}
