//! Normalizer configuration stored in ~/.emailhub/config.json
//!
//! Every field has a default, so a missing file or a partial document is
//! valid. Only reading is supported here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizerConfig {
    #[serde(default)]
    pub limits: NormalizerLimits,
    #[serde(default)]
    pub agent: AgentSettings,
}

/// Recursion ceilings for the searches over agent responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizerLimits {
    /// Nested JSON-in-string decodes
    #[serde(default = "default_coerce_depth")]
    pub coerce_depth: u32,
    /// Email list and aggregate searches
    #[serde(default = "default_search_depth")]
    pub search_depth: u32,
    /// Reply draft search
    #[serde(default = "default_reply_depth")]
    pub reply_depth: u32,
}

impl Default for NormalizerLimits {
    fn default() -> Self {
        Self {
            coerce_depth: default_coerce_depth(),
            search_depth: default_search_depth(),
            reply_depth: default_reply_depth(),
        }
    }
}

fn default_coerce_depth() -> u32 {
    5
}

fn default_search_depth() -> u32 {
    8
}

fn default_reply_depth() -> u32 {
    6
}

/// Options folded into the processing request sent to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSettings {
    #[serde(default = "default_max_emails")]
    pub max_emails: u32,
    /// Comma-separated senders to prioritize
    #[serde(default)]
    pub vip_senders: String,
    #[serde(default)]
    pub priority_keywords: String,
    /// Overrides the default fetch instruction when non-empty
    #[serde(default)]
    pub default_query: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_emails: default_max_emails(),
            vip_senders: String::new(),
            priority_keywords: String::new(),
            default_query: String::new(),
        }
    }
}

fn default_max_emails() -> u32 {
    10
}

/// Default location: ~/.emailhub/config.json
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".emailhub").join("config.json"))
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: &Path) -> Result<NormalizerConfig, ConfigError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(NormalizerConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: NormalizerConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;

    Ok(config)
}

/// Reject limits that would disable a search entirely.
pub fn validate_config(config: &NormalizerConfig) -> Result<(), ConfigError> {
    let limits = &config.limits;
    if limits.coerce_depth == 0 {
        return Err(ConfigError::Invalid("coerceDepth must be at least 1".into()));
    }
    if limits.search_depth == 0 {
        return Err(ConfigError::Invalid("searchDepth must be at least 1".into()));
    }
    if limits.reply_depth == 0 {
        return Err(ConfigError::Invalid("replyDepth must be at least 1".into()));
    }
    if config.agent.max_emails == 0 {
        return Err(ConfigError::Invalid("maxEmails must be at least 1".into()));
    }
    Ok(())
}
