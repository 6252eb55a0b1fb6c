//! Analyzer configuration loaded from TOML
//!
//! # Example TOML
//!
//! ```toml
//! [analysis]
//! skip_malformed = true
//! show_empty_tiers = false
//! format = "json"
//! ```
//!
//! Every key is optional. Command-line flags take precedence over the file.

use crate::cli::OutputFormat;
use crate::error::{LogError, Result};
use crate::stats::MalformedPolicy;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// `[analysis]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisSection {
    /// Skip and count bad lines instead of aborting
    pub skip_malformed: Option<bool>,
    /// List all four tiers per path, zero counts included
    pub show_empty_tiers: Option<bool>,
    /// Default output format
    pub format: Option<OutputFormat>,
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub analysis: AnalysisSection,
}

/// Effective settings for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub policy: MalformedPolicy,
    pub show_empty_tiers: bool,
    pub format: OutputFormat,
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        tracing::debug!("Loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| LogError::Config(e.to_string()))
    }

    /// Merge command-line flags over the file values
    ///
    /// Boolean flags can only switch a behavior on; an unset flag defers to
    /// the file, then to the built-in default.
    pub fn resolve(
        &self,
        skip_malformed: bool,
        show_empty_tiers: bool,
        format: Option<OutputFormat>,
    ) -> Settings {
        let skip = skip_malformed || self.analysis.skip_malformed.unwrap_or(false);

        Settings {
            policy: if skip {
                MalformedPolicy::Skip
            } else {
                MalformedPolicy::Abort
            },
            show_empty_tiers: show_empty_tiers || self.analysis.show_empty_tiers.unwrap_or(false),
            format: format
                .or(self.analysis.format)
                .unwrap_or(OutputFormat::Text),
        }
    }
}
