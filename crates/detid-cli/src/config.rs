//! # CLI Configuration
//!
//! Defaults for the identifier subcommands, resolved in increasing order
//! of precedence:
//!
//! 1. built-in defaults (DNS namespace, SHA-1, the fixed fingerprint namespace),
//! 2. a YAML file passed with `--config`,
//! 3. the `DETID_NAMESPACE` and `DETID_HASH` environment variables,
//! 4. command-line flags.
//!
//! ```yaml
//! namespace: url
//! hash: sha256
//! fingerprint_namespace: text:inventory
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use detid_core::{DigestAlgorithm, Namespace, FINGERPRINT_NAMESPACE};

/// Environment variable overriding the default namespace.
pub const NAMESPACE_ENV: &str = "DETID_NAMESPACE";

/// Environment variable overriding the default hash algorithm.
pub const HASH_ENV: &str = "DETID_HASH";

/// Raw configuration as written in the YAML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Default namespace for `detid uuid`.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Default hash algorithm for `detid uuid`.
    #[serde(default)]
    pub hash: Option<String>,
    /// Namespace for `detid fingerprint`.
    #[serde(default)]
    pub fingerprint_namespace: Option<String>,
}

impl CliConfig {
    /// Load the YAML file at `path`, or the empty configuration if `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(ns) = lookup(NAMESPACE_ENV) {
            self.namespace = Some(ns);
        }
        if let Some(hash) = lookup(HASH_ENV) {
            self.hash = Some(hash);
        }
        self
    }

    /// Apply overrides from the process environment.
    pub fn with_process_env(self) -> Self {
        self.with_env(|name| std::env::var(name).ok())
    }

    /// The namespace to use, preferring `flag` over the configured value.
    pub fn namespace(&self, flag: Option<&str>) -> Result<Namespace> {
        match flag.or(self.namespace.as_deref()) {
            Some(text) => text
                .parse()
                .with_context(|| format!("invalid namespace {text:?}")),
            None => Ok(Namespace::DNS),
        }
    }

    /// The hash algorithm to use, preferring `flag` over the configured value.
    pub fn hash(&self, flag: Option<&str>) -> Result<DigestAlgorithm> {
        match flag.or(self.hash.as_deref()) {
            Some(text) => text
                .parse()
                .with_context(|| format!("invalid hash algorithm {text:?}")),
            None => Ok(DigestAlgorithm::Sha1),
        }
    }

    /// The namespace fingerprints are derived in.
    pub fn fingerprint_namespace(&self) -> Result<Namespace> {
        match self.fingerprint_namespace.as_deref() {
            Some(text) => text
                .parse()
                .with_context(|| format!("invalid fingerprint namespace {text:?}")),
            None => Ok(Namespace::Uuid(FINGERPRINT_NAMESPACE)),
        }
    }
}
