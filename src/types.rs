use serde::{Deserialize, Serialize};

/// Untyped value tree returned by the upstream agent.
///
/// Every locator matches exhaustively over its variants
/// (null | bool | number | string | array | object).
pub type RawTree = serde_json::Value;

/// Priority levels the agent is asked to emit. The field itself stays an open
/// string; unknown levels rank after `Low`.
pub const PRIORITY_CRITICAL: &str = "Critical";
pub const PRIORITY_HIGH: &str = "High";
pub const PRIORITY_MEDIUM: &str = "Medium";
pub const PRIORITY_LOW: &str = "Low";

/// Sort rank for a priority level (Critical first).
pub fn priority_rank(level: &str) -> u8 {
    match level {
        PRIORITY_CRITICAL => 0,
        PRIORITY_HIGH => 1,
        PRIORITY_MEDIUM => 2,
        PRIORITY_LOW => 3,
        _ => 4,
    }
}

/// A follow-up extracted from an email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub task: String,
    pub owner: String,
    #[serde(rename = "type")]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deadline {
    pub item: String,
    pub date: String,
}

/// A single processed email in canonical shape.
///
/// Every field is always populated; missing upstream data degrades to the
/// defaults applied by `normalize::record::normalize_record`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub email_id: String,
    pub sender: String,
    pub subject: String,
    /// Received-at timestamp, RFC 3339 when derivable, otherwise verbatim.
    pub date: String,
    pub summary: String,
    pub technical_context: String,
    pub tone: String,
    pub priority_level: String,
    pub priority_rationale: String,
    pub urgency_signals: Vec<String>,
    pub action_items: Vec<ActionItem>,
    pub technical_decisions: Vec<String>,
    pub deadlines: Vec<Deadline>,
    pub stakeholder_requests: Vec<String>,
    pub system_references: Vec<String>,
    pub reply_draft: String,
    pub reply_tone: String,
    pub key_points_addressed: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replied: Option<bool>,
}

impl CanonicalRecord {
    pub fn is_priority(&self, level: &str) -> bool {
        self.priority_level == level
    }

    /// Critical or High
    pub fn is_urgent(&self) -> bool {
        self.is_priority(PRIORITY_CRITICAL) || self.is_priority(PRIORITY_HIGH)
    }
}

/// The normalized outcome of one processing cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalResult {
    #[serde(rename = "emails")]
    pub records: Vec<CanonicalRecord>,
    #[serde(rename = "total_emails")]
    pub total: u64,
    pub critical_count: u64,
    pub high_count: u64,
    #[serde(rename = "processing_timestamp")]
    pub processed_at: String,
}

impl CanonicalResult {
    /// Build a result whose counters are derived from the records.
    pub fn from_records(records: Vec<CanonicalRecord>, processed_at: String) -> Self {
        Aggregates::default().compose(records, processed_at)
    }
}

/// Counters found in an agent response. Absent fields were not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    pub total: Option<u64>,
    pub critical: Option<u64>,
    pub high: Option<u64>,
    pub processed_at: Option<String>,
}

impl Aggregates {
    pub fn is_empty(&self) -> bool {
        self.total.is_none()
            && self.critical.is_none()
            && self.high.is_none()
            && self.processed_at.is_none()
    }

    /// Combine supplied counters with records, deriving whatever is missing.
    ///
    /// A supplied total of zero counts as missing. Supplied critical/high
    /// counts are used as-is, zero included. `fallback_timestamp` is used when
    /// no non-empty timestamp was supplied.
    pub fn compose(
        self,
        records: Vec<CanonicalRecord>,
        fallback_timestamp: String,
    ) -> CanonicalResult {
        let count_level =
            |level: &str| records.iter().filter(|r| r.is_priority(level)).count() as u64;

        let total = self
            .total
            .filter(|t| *t > 0)
            .unwrap_or(records.len() as u64);
        let critical_count = self.critical.unwrap_or_else(|| count_level(PRIORITY_CRITICAL));
        let high_count = self.high.unwrap_or_else(|| count_level(PRIORITY_HIGH));
        let processed_at = self
            .processed_at
            .filter(|ts| !ts.is_empty())
            .unwrap_or(fallback_timestamp);

        CanonicalResult {
            records,
            total,
            critical_count,
            high_count,
            processed_at,
        }
    }
}
