//! Find a generated reply draft nested at an unknown depth.

use std::borrow::Cow;

use crate::config::NormalizerLimits;
use crate::error::NormalizeError;
use crate::types::RawTree;

use super::coerce::coerce_value;
use super::constants::{AGGREGATE_ENVELOPE_KEYS, RECORDS_KEY, REPLY_FAILED_MESSAGE};
use super::{is_present, non_empty_str};

const REPLY_KEYS: &[&str] = &["reply_draft", "replyDraft", "reply", "draft"];

/// Search `tree` for reply draft text.
///
/// A plain string is itself the draft; a string holding JSON is decoded and
/// searched. Objects are checked for the draft keys, then the first email's
/// `reply_draft`, then the envelope keys. An empty string means not found.
pub fn find_reply_draft(tree: &RawTree, depth: u32, limits: &NormalizerLimits) -> String {
    if depth > limits.reply_depth {
        return String::new();
    }

    match tree {
        RawTree::String(text) => match coerce_value(tree, 0, limits) {
            Cow::Owned(decoded) => find_reply_draft(&decoded, depth + 1, limits),
            Cow::Borrowed(_) => text.clone(),
        },
        RawTree::Object(map) => {
            if let Some(draft) = REPLY_KEYS.iter().find_map(|key| non_empty_str(map.get(*key))) {
                return draft.to_string();
            }

            let first_record = map
                .get(RECORDS_KEY)
                .and_then(RawTree::as_array)
                .and_then(|records| records.first());
            if let Some(draft) = non_empty_str(first_record.and_then(|r| r.get("reply_draft"))) {
                return draft.to_string();
            }

            for key in AGGREGATE_ENVELOPE_KEYS {
                let Some(inner) = map.get(*key).filter(|v| !v.is_null()) else {
                    continue;
                };
                let found = find_reply_draft(&coerce_value(inner, 0, limits), depth + 1, limits);
                if !found.is_empty() {
                    return found;
                }
            }
            String::new()
        }
        RawTree::Null | RawTree::Bool(_) | RawTree::Number(_) | RawTree::Array(_) => String::new(),
    }
}

/// Extract the draft from a reply-generation response.
///
/// Fails unless the response reports success. Searches `response`, then the
/// whole document, then falls back to `response.message`. `Ok("")` means the
/// agent succeeded without returning draft text.
pub fn extract_reply_draft(
    response: &RawTree,
    limits: &NormalizerLimits,
) -> Result<String, NormalizeError> {
    if !response.get("success").is_some_and(is_present) {
        let message = non_empty_str(response.get("error")).unwrap_or(REPLY_FAILED_MESSAGE);
        log::warn!("Reply generation failed: {}", message);
        return Err(NormalizeError::UpstreamFailed(message.to_string()));
    }

    let inner = response.get("response");
    let draft = inner
        .map(|r| find_reply_draft(r, 0, limits))
        .filter(|d| !d.is_empty())
        .or_else(|| Some(find_reply_draft(response, 0, limits)).filter(|d| !d.is_empty()))
        .or_else(|| non_empty_str(inner.and_then(|r| r.get("message"))).map(String::from))
        .unwrap_or_default();

    if draft.is_empty() {
        log::info!("Reply generated but no draft text was returned");
    }
    Ok(draft)
}
