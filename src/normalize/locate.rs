//! Find the email list inside an agent response tree.

use crate::config::NormalizerLimits;
use crate::types::RawTree;

use super::coerce::coerce_value;
use super::constants::{RECORDS_KEY, RECORD_ENVELOPE_KEYS};
use super::is_present;

/// Search `tree` for a non-empty list of email-shaped objects.
///
/// Rules, first match wins:
/// 1. an object's non-empty `emails` array
/// 2. the tree itself, when it is an array whose first element has a
///    `subject` or `sender`
/// 3. the value under each envelope key, coerced and searched one level deeper
///
/// Returns `None` past `search_depth` or when nothing matches.
pub fn find_records(tree: &RawTree, depth: u32, limits: &NormalizerLimits) -> Option<Vec<RawTree>> {
    if depth > limits.search_depth {
        return None;
    }

    match tree {
        RawTree::Object(map) => {
            if let Some(RawTree::Array(records)) = map.get(RECORDS_KEY) {
                if !records.is_empty() {
                    return Some(records.clone());
                }
            }

            for key in RECORD_ENVELOPE_KEYS {
                let Some(inner) = map.get(*key).filter(|v| !v.is_null()) else {
                    continue;
                };
                let coerced = coerce_value(inner, 0, limits);
                if let Some(found) = find_records(&coerced, depth + 1, limits) {
                    return Some(found);
                }
            }
            None
        }
        RawTree::Array(items) => {
            if looks_like_record_list(items) {
                Some(items.clone())
            } else {
                None
            }
        }
        RawTree::Null | RawTree::Bool(_) | RawTree::Number(_) | RawTree::String(_) => None,
    }
}

fn looks_like_record_list(items: &[RawTree]) -> bool {
    match items.first() {
        Some(RawTree::Object(first)) => ["subject", "sender"]
            .iter()
            .any(|key| first.get(*key).is_some_and(is_present)),
        _ => false,
    }
}
