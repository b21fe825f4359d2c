//! Turn a full agent response into a `CanonicalResult`.
//!
//! Agent frameworks wrap the payload inconsistently, so several candidate
//! roots are tried, most specific first:
//! 1. `response.result`
//! 2. `response`
//! 3. `raw_response`
//! 4. the whole response
//!
//! The first candidate yielding emails is used for both records and counters;
//! later candidates are never consulted.

use std::borrow::Cow;

use crate::config::NormalizerLimits;
use crate::error::NormalizeError;
use crate::types::{CanonicalResult, RawTree};

use super::aggregate::find_aggregates;
use super::coerce::coerce_value;
use super::constants::NO_RECORDS_MESSAGE;
use super::locate::find_records;
use super::record::{normalize_record, now_timestamp};
use super::{is_present, non_empty_str, truncate_for_log};

const LOG_PREVIEW_CHARS: usize = 500;
const LOG_DUMP_CHARS: usize = 1000;

/// Normalize a processing response.
///
/// `success: false` short-circuits with `UpstreamFailed`; otherwise a
/// response without emails yields `NoRecords`. Both carry the message from
/// [`failure_message`].
pub fn normalize_response(
    response: &RawTree,
    limits: &NormalizerLimits,
) -> Result<CanonicalResult, NormalizeError> {
    let raw_json = response.to_string();
    log::debug!(
        "Raw agent response: {}",
        truncate_for_log(&raw_json, LOG_PREVIEW_CHARS)
    );

    if response.is_null() {
        return Err(NormalizeError::NoRecords(NO_RECORDS_MESSAGE.to_string()));
    }

    if response.get("success") == Some(&RawTree::Bool(false)) {
        let message = failure_message(response);
        log::warn!("Agent returned error: {}", message);
        return Err(NormalizeError::UpstreamFailed(message));
    }

    let candidates = candidate_roots(response, limits);
    log::debug!("Searching {} candidates for emails array", candidates.len());

    for (index, candidate) in candidates.iter().enumerate() {
        let Some(raw_records) = find_records(candidate, 0, limits) else {
            continue;
        };
        log::info!(
            "Found {} emails in candidate {}",
            raw_records.len(),
            index + 1
        );

        let records = raw_records.iter().map(normalize_record).collect();
        let aggregates = find_aggregates(candidate, 0, limits);
        return Ok(aggregates.compose(records, now_timestamp()));
    }

    log::warn!(
        "No emails found in any candidate. Full result: {}",
        truncate_for_log(&raw_json, LOG_DUMP_CHARS)
    );
    Err(NormalizeError::NoRecords(failure_message(response)))
}

/// Candidate roots in search order, each string-coerced.
fn candidate_roots<'a>(response: &'a RawTree, limits: &NormalizerLimits) -> Vec<Cow<'a, RawTree>> {
    let mut candidates = Vec::with_capacity(4);
    let inner = response.get("response").filter(|v| !v.is_null());

    if let Some(result) = inner.and_then(|r| r.get("result")).filter(|v| !v.is_null()) {
        candidates.push(coerce_value(result, 0, limits));
    }
    if let Some(inner) = inner {
        candidates.push(coerce_value(inner, 0, limits));
    }
    if let Some(raw) = response.get("raw_response").filter(|v| is_present(v)) {
        candidates.push(coerce_value(raw, 0, limits));
    }
    candidates.push(Cow::Borrowed(response));

    candidates
}

/// Best available explanation for a response without emails.
///
/// Precedence: `error`, `response.message`, `response.result.text`,
/// `response.result` when it is a string, then a generic message.
pub fn failure_message(response: &RawTree) -> String {
    let inner = response.get("response");
    let result = inner.and_then(|r| r.get("result"));

    non_empty_str(response.get("error"))
        .or_else(|| non_empty_str(inner.and_then(|r| r.get("message"))))
        .or_else(|| non_empty_str(result.and_then(|r| r.get("text"))))
        .or_else(|| non_empty_str(result))
        .unwrap_or(NO_RECORDS_MESSAGE)
        .to_string()
}
