//! EmailHub response normalization.
//!
//! The email orchestrator agent answers with JSON whose shape is not fixed.
//! `normalize` finds the email list, counters and reply drafts in whatever
//! wrapping the agent chose and returns canonical, default-complete records.

pub mod config;
pub mod error;
pub mod normalize;
pub mod prompts;
pub mod triage;
pub mod types;

pub use config::{load_config, AgentSettings, NormalizerConfig, NormalizerLimits};
pub use error::{ConfigError, NormalizeError, NormalizeFailure, PromptError};
pub use normalize::Normalizer;
pub use types::{ActionItem, Aggregates, CanonicalRecord, CanonicalResult, Deadline, RawTree};
