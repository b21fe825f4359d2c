//! Decode JSON documents that the agent embedded inside string fields.

use std::borrow::Cow;

use crate::config::NormalizerLimits;
use crate::types::RawTree;

/// Reinterpret a string leaf holding a JSON object or array as that value.
///
/// The decoded value is coerced again one level deeper; nothing is decoded
/// once `depth` exceeds `coerce_depth`. Strings that do not parse and all
/// non-string values are returned unchanged.
pub fn coerce_value<'a>(
    value: &'a RawTree,
    depth: u32,
    limits: &NormalizerLimits,
) -> Cow<'a, RawTree> {
    if depth > limits.coerce_depth {
        return Cow::Borrowed(value);
    }
    match value {
        RawTree::String(text) => match decode_embedded(text) {
            Some(decoded) => Cow::Owned(coerce_owned(decoded, depth + 1, limits)),
            None => Cow::Borrowed(value),
        },
        RawTree::Null
        | RawTree::Bool(_)
        | RawTree::Number(_)
        | RawTree::Array(_)
        | RawTree::Object(_) => Cow::Borrowed(value),
    }
}

fn coerce_owned(value: RawTree, depth: u32, limits: &NormalizerLimits) -> RawTree {
    if depth > limits.coerce_depth {
        return value;
    }
    let decoded = match &value {
        RawTree::String(text) => decode_embedded(text),
        _ => None,
    };
    match decoded {
        Some(inner) => coerce_owned(inner, depth + 1, limits),
        None => value,
    }
}

/// Parse `text` if its trimmed form is bracketed like an object or array.
fn decode_embedded(text: &str) -> Option<RawTree> {
    let trimmed = text.trim();
    let bracketed = (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'));
    if !bracketed {
        return None;
    }

    match serde_json::from_str(trimmed) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::debug!("Embedded JSON did not parse, keeping string: {}", e);
            None
        }
    }
}
