//! Agent response normalization.
//!
//! The upstream agent returns an arbitrary JSON tree whose shape drifts
//! between runs. This module turns it into a `CanonicalResult`:
//! - coerce: decode JSON documents embedded in string leaves
//! - locate: find the email list inside the tree
//! - aggregate: find the supplied counters
//! - record: map one raw email onto `CanonicalRecord`
//! - orchestrate: try candidate roots in order and compose the result
//! - reply: find a generated reply draft
//!
//! Every search is pure and bounded by `NormalizerLimits`.

pub mod aggregate;
pub mod coerce;
pub mod constants;
pub mod locate;
pub mod orchestrate;
pub mod record;
pub mod reply;

use crate::config::{NormalizerConfig, NormalizerLimits};
use crate::error::NormalizeError;
use crate::types::{CanonicalResult, RawTree};

/// Entry point bundling the recursion limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    limits: NormalizerLimits,
}

impl Normalizer {
    pub fn new(limits: NormalizerLimits) -> Self {
        Self { limits }
    }

    pub fn from_config(config: &NormalizerConfig) -> Self {
        Self::new(config.limits)
    }

    pub fn limits(&self) -> &NormalizerLimits {
        &self.limits
    }

    /// Normalize a processing response into records plus counters.
    pub fn normalize(&self, response: &RawTree) -> Result<CanonicalResult, NormalizeError> {
        orchestrate::normalize_response(response, &self.limits)
    }

    /// Extract a reply draft from a reply-generation response.
    ///
    /// `Ok("")` means the agent succeeded but no draft text was found.
    pub fn reply_draft(&self, response: &RawTree) -> Result<String, NormalizeError> {
        reply::extract_reply_draft(response, &self.limits)
    }
}

/// Whether a value counts as supplied: not null, false, zero or an empty string.
pub(crate) fn is_present(value: &RawTree) -> bool {
    match value {
        RawTree::Null => false,
        RawTree::Bool(b) => *b,
        RawTree::Number(n) => n.as_f64() != Some(0.0),
        RawTree::String(s) => !s.is_empty(),
        RawTree::Array(_) | RawTree::Object(_) => true,
    }
}

/// Non-empty string value, if `value` is one.
pub(crate) fn non_empty_str(value: Option<&RawTree>) -> Option<&str> {
    match value {
        Some(RawTree::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// Truncate a string to `max_chars` characters for log output.
pub(crate) fn truncate_for_log(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_present() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!(false)));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!("")));
        assert!(is_present(&json!("x")));
        assert!(is_present(&json!(3)));
        assert!(is_present(&json!([])));
        assert!(is_present(&json!({})));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        assert_eq!(truncate_for_log("héllo", 2), "hé");
        assert_eq!(truncate_for_log("abc", 10), "abc");
    }

    #[test]
    fn test_normalizer_facade() {
        let normalizer = Normalizer::default();
        let response = json!({
            "success": true,
            "response": {"result": {"emails": [{"subject": "Hi"}]}}
        });
        let result = normalizer.normalize(&response).unwrap();
        assert_eq!(result.records.len(), 1);

        let reply = json!({"success": true, "response": {"result": {"reply_draft": "Thanks!"}}});
        assert_eq!(normalizer.reply_draft(&reply).unwrap(), "Thanks!");
    }
}
