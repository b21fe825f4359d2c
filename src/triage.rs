//! Inbox views over normalized records: ordering, filtering, reply state.

use crate::types::{priority_rank, CanonicalRecord, CanonicalResult};

/// Priority filter value that matches every record.
pub const FILTER_ALL: &str = "all";

/// Stable sort, Critical first. Unknown levels sort last.
pub fn sort_by_priority(records: &mut [CanonicalRecord]) {
    records.sort_by_key(|r| priority_rank(&r.priority_level));
}

/// Records matching `priority` (or `"all"`) whose sender or subject contains
/// `query`, case-insensitively. An empty query matches everything.
pub fn filter_records<'a>(
    records: &'a [CanonicalRecord],
    priority: &str,
    query: &str,
) -> Vec<&'a CanonicalRecord> {
    let query = query.to_lowercase();
    records
        .iter()
        .filter(|r| priority == FILTER_ALL || r.priority_level == priority)
        .filter(|r| {
            query.is_empty()
                || r.sender.to_lowercase().contains(&query)
                || r.subject.to_lowercase().contains(&query)
        })
        .collect()
}

/// Critical and High records, in their current order.
pub fn urgent_records(records: &[CanonicalRecord]) -> Vec<&CanonicalRecord> {
    records.iter().filter(|r| r.is_urgent()).collect()
}

/// Flag the record with `email_id` as replied. Returns false if none matched.
pub fn mark_replied(result: &mut CanonicalResult, email_id: &str) -> bool {
    match result.records.iter_mut().find(|r| r.email_id == email_id) {
        Some(record) => {
            record.replied = Some(true);
            true
        }
        None => {
            log::warn!("mark_replied: no email with id {}", email_id);
            false
        }
    }
}
