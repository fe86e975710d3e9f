//! # Key Subcommand
//!
//! Builds a composite cache key over JSON records. Selectors name the
//! record fields that contribute, in order; a missing field contributes
//! the null key.
//!
//! A JSON object is keyed as one record. A JSON array is keyed as a
//! multi-instance build: `null` entries are skipped and duplicate records
//! contribute once.
//!
//! ```bash
//! detid key order.json --select id,customer
//! detid key orders.json --select id --binary
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;

use detid_keys::{
    AttributeValue, CacheKeyBuilder, KeyKind, KeySchema, TextKey, ToAttribute, UuidKey,
};

use crate::read_json;

/// Arguments for the `detid key` subcommand.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// JSON record, or array of records (`-` for standard input).
    pub file: PathBuf,

    /// Comma-separated field names, in key order.
    #[arg(long, short, value_delimiter = ',', required = true)]
    pub select: Vec<String>,

    /// Print a 128-bit key instead of a text key.
    #[arg(long)]
    pub binary: bool,

    /// Type name embedded in text keys.
    #[arg(long, default_value = "Record")]
    pub type_name: String,
}

/// A schema selecting the named fields of a JSON record.
pub fn record_schema(type_name: &str, fields: &[String]) -> KeySchema<Value> {
    fields.iter().fold(KeySchema::new(type_name.to_string()), |schema, field| {
        let name = field.clone();
        schema.select(field.clone(), move |record: &Value| {
            record.get(&name).map_or(AttributeValue::Null, ToAttribute::to_attribute)
        })
    })
}

/// Build the key described by `args`, rendered as text.
pub fn build_key(args: &KeyArgs) -> Result<String> {
    let document = read_json(&args.file)?;
    let schema = record_schema(&args.type_name, &args.select);
    let key = if args.binary {
        key_of::<UuidKey>(&document, &schema)?.to_string()
    } else {
        key_of::<TextKey>(&document, &schema)?
    };
    Ok(key)
}

fn key_of<K: KeyKind>(document: &Value, schema: &KeySchema<Value>) -> Result<K::Key> {
    let builder = CacheKeyBuilder::<K>::new();
    let key = match document {
        Value::Object(_) => builder.build(document, schema),
        Value::Array(records) => {
            tracing::debug!(records = records.len(), "building multi-record key");
            builder.build_many(records.iter().map(|r| (!r.is_null()).then_some(r)), schema)
        }
        other => bail!("expected a JSON object or array, found {}", json_kind(other)),
    };
    key.context("cannot build key")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Execute the key subcommand.
pub fn run_key(args: &KeyArgs) -> Result<u8> {
    println!("{}", build_key(args)?);
    Ok(0)
}
