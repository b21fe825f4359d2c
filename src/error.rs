//! Error types for response normalization
//!
//! Errors are classified by origin:
//! - Upstream: the agent reported failure itself
//! - NoRecords: the response was readable but carried no email list
//!
//! Malformed embedded JSON and depth-limit cutoffs are not errors; they
//! degrade to "not found" at the branch where they occur.

use std::path::PathBuf;
use thiserror::Error;

/// Outcome of a normalization that produced no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The response signalled `success: false`. Searching was skipped.
    #[error("{0}")]
    UpstreamFailed(String),

    /// No candidate tree contained an email list.
    #[error("{0}")]
    NoRecords(String),
}

impl NormalizeError {
    /// The human-readable message shown in place of the inbox.
    pub fn message(&self) -> &str {
        match self {
            NormalizeError::UpstreamFailed(msg) | NormalizeError::NoRecords(msg) => msg.as_str(),
        }
    }

    /// Returns true if the agent itself reported the failure
    pub fn is_upstream(&self) -> bool {
        matches!(self, NormalizeError::UpstreamFailed(_))
    }
}

/// Serializable failure representation for the presentation layer
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeFailure {
    pub message: String,
    pub kind: FailureKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Upstream,
    NoData,
}

impl From<&NormalizeError> for NormalizeFailure {
    fn from(err: &NormalizeError) -> Self {
        let kind = if err.is_upstream() {
            FailureKind::Upstream
        } else {
            FailureKind::NoData
        };

        NormalizeFailure {
            message: err.message().to_string(),
            kind,
        }
    }
}

/// Errors raised while loading `config.json`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while building agent request messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("Reply cannot be empty.")]
    EmptyDraft,
}
