use serde::Deserialize;
use std::fmt;

/// Report formats the CLI can emit
///
/// Shared by the CLI (`--format`), the config file (`format:`) and the
/// formatter factory, so parsing lives in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Machine-readable JSON report (default)
    #[default]
    Json,
    /// Human-readable Markdown report
    #[value(alias = "md")]
    #[serde(alias = "md")]
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}
