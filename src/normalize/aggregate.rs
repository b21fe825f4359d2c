//! Find the counters the agent reports alongside the email list.

use serde_json::Map;

use crate::config::NormalizerLimits;
use crate::types::{Aggregates, RawTree};

use super::coerce::coerce_value;
use super::constants::AGGREGATE_ENVELOPE_KEYS;

/// Search `tree` for `total_emails`, `critical_count`, `high_count` and
/// `processing_timestamp`.
///
/// The first object carrying any of them wins outright; fields it lacks stay
/// unset rather than being filled from other levels.
pub fn find_aggregates(tree: &RawTree, depth: u32, limits: &NormalizerLimits) -> Aggregates {
    if depth > limits.search_depth {
        return Aggregates::default();
    }

    let map = match tree {
        RawTree::Object(map) => map,
        RawTree::Null
        | RawTree::Bool(_)
        | RawTree::Number(_)
        | RawTree::String(_)
        | RawTree::Array(_) => return Aggregates::default(),
    };

    let direct = direct_aggregates(map);
    if !direct.is_empty() {
        return direct;
    }

    for key in AGGREGATE_ENVELOPE_KEYS {
        let Some(inner) = map.get(*key).filter(|v| !v.is_null()) else {
            continue;
        };
        let coerced = coerce_value(inner, 0, limits);
        if coerced.is_object() {
            let found = find_aggregates(&coerced, depth + 1, limits);
            if !found.is_empty() {
                return found;
            }
        }
    }

    Aggregates::default()
}

fn direct_aggregates(map: &Map<String, RawTree>) -> Aggregates {
    Aggregates {
        total: map.get("total_emails").and_then(as_count),
        critical: map.get("critical_count").and_then(as_count),
        high: map.get("high_count").and_then(as_count),
        processed_at: map
            .get("processing_timestamp")
            .and_then(RawTree::as_str)
            .map(String::from),
    }
}

/// Non-negative whole number. Integral floats such as `3.0` are accepted.
fn as_count(value: &RawTree) -> Option<u64> {
    match value {
        RawTree::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}
