//! Map one raw email object onto `CanonicalRecord`.
//!
//! Field names drift between agent runs (`sender` vs `from`, snake vs camel
//! case). Each canonical field lists its accepted keys in priority order; the
//! first key holding a value of the right shape wins, otherwise the field
//! falls back to its default. Normalization never fails.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Map;

use crate::types::{ActionItem, CanonicalRecord, Deadline, RawTree};

type Object = Map<String, RawTree>;

const ID_KEYS: &[&str] = &["email_id", "id", "messageId", "message_id"];
const SENDER_KEYS: &[&str] = &["sender", "from", "senderName", "sender_name"];
const SUBJECT_KEYS: &[&str] = &["subject", "title"];
const DATE_KEYS: &[&str] = &["date", "timestamp", "received_at", "receivedAt"];
const SUMMARY_KEYS: &[&str] = &["summary", "description", "snippet"];
const TECHNICAL_CONTEXT_KEYS: &[&str] = &["technical_context", "technicalContext"];
const TONE_KEYS: &[&str] = &["tone"];
const PRIORITY_KEYS: &[&str] = &["priority_level", "priorityLevel", "priority"];
const PRIORITY_RATIONALE_KEYS: &[&str] = &["priority_rationale", "priorityRationale"];
const URGENCY_SIGNALS_KEYS: &[&str] = &["urgency_signals", "urgencySignals"];
const ACTION_ITEMS_KEYS: &[&str] = &["action_items", "actionItems"];
const TECHNICAL_DECISIONS_KEYS: &[&str] = &["technical_decisions", "technicalDecisions"];
const DEADLINES_KEYS: &[&str] = &["deadlines"];
const STAKEHOLDER_REQUESTS_KEYS: &[&str] = &["stakeholder_requests", "stakeholderRequests"];
const SYSTEM_REFERENCES_KEYS: &[&str] = &["system_references", "systemReferences"];
const REPLY_DRAFT_KEYS: &[&str] = &["reply_draft", "replyDraft", "reply"];
const REPLY_TONE_KEYS: &[&str] = &["reply_tone", "replyTone"];
const KEY_POINTS_KEYS: &[&str] = &["key_points_addressed", "keyPointsAddressed"];

const TASK_KEYS: &[&str] = &["task", "description", "text"];
const OWNER_KEYS: &[&str] = &["owner", "assignee"];
const CATEGORY_KEYS: &[&str] = &["type", "category"];
const DEADLINE_ITEM_KEYS: &[&str] = &["item", "description", "task"];
const DEADLINE_DATE_KEYS: &[&str] = &["date", "due", "deadline"];

pub const DEFAULT_SENDER: &str = "Unknown";
pub const DEFAULT_SUBJECT: &str = "No Subject";
pub const DEFAULT_PRIORITY: &str = "Medium";
pub const DEFAULT_OWNER: &str = "Unassigned";
pub const DEFAULT_CATEGORY: &str = "task";

/// Epoch values above this are taken as milliseconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Normalize one raw email. Non-object input yields an all-default record.
pub fn normalize_record(raw: &RawTree) -> CanonicalRecord {
    match raw {
        RawTree::Object(obj) => from_object(obj),
        RawTree::Null
        | RawTree::Bool(_)
        | RawTree::Number(_)
        | RawTree::String(_)
        | RawTree::Array(_) => from_object(&Object::new()),
    }
}

fn from_object(obj: &Object) -> CanonicalRecord {
    CanonicalRecord {
        email_id: resolve(obj, ID_KEYS, identifier).unwrap_or_else(synthesize_id),
        sender: text_or(obj, SENDER_KEYS, DEFAULT_SENDER),
        subject: text_or(obj, SUBJECT_KEYS, DEFAULT_SUBJECT),
        date: resolve(obj, DATE_KEYS, timestamp).unwrap_or_else(now_timestamp),
        summary: text_or(obj, SUMMARY_KEYS, ""),
        technical_context: text_or(obj, TECHNICAL_CONTEXT_KEYS, ""),
        tone: text_or(obj, TONE_KEYS, ""),
        priority_level: text_or(obj, PRIORITY_KEYS, DEFAULT_PRIORITY),
        priority_rationale: text_or(obj, PRIORITY_RATIONALE_KEYS, ""),
        urgency_signals: string_list(obj, URGENCY_SIGNALS_KEYS),
        action_items: list_of(obj, ACTION_ITEMS_KEYS, action_item),
        technical_decisions: string_list(obj, TECHNICAL_DECISIONS_KEYS),
        deadlines: list_of(obj, DEADLINES_KEYS, deadline),
        stakeholder_requests: string_list(obj, STAKEHOLDER_REQUESTS_KEYS),
        system_references: string_list(obj, SYSTEM_REFERENCES_KEYS),
        reply_draft: text_or(obj, REPLY_DRAFT_KEYS, ""),
        reply_tone: text_or(obj, REPLY_TONE_KEYS, ""),
        key_points_addressed: string_list(obj, KEY_POINTS_KEYS),
        replied: obj.get("replied").and_then(RawTree::as_bool),
    }
}

/// First key in `keys` whose value `pick` accepts.
fn resolve<'a, T>(
    obj: &'a Object,
    keys: &[&str],
    pick: impl Fn(&'a RawTree) -> Option<T>,
) -> Option<T> {
    keys.iter().find_map(|key| obj.get(*key).and_then(&pick))
}

fn non_empty_text(value: &RawTree) -> Option<String> {
    match value {
        RawTree::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn text_or(obj: &Object, keys: &[&str], default: &str) -> String {
    resolve(obj, keys, non_empty_text).unwrap_or_else(|| default.to_string())
}

/// Identifiers may arrive as numbers. Zero counts as absent.
fn identifier(value: &RawTree) -> Option<String> {
    match value {
        RawTree::Number(n) if super::is_present(value) => Some(n.to_string()),
        other => non_empty_text(other),
    }
}

/// Strings pass through verbatim; epoch numbers become RFC 3339.
fn timestamp(value: &RawTree) -> Option<String> {
    match value {
        RawTree::Number(n) => {
            let epoch = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            let parsed = if epoch.unsigned_abs() > EPOCH_MILLIS_THRESHOLD.unsigned_abs() {
                DateTime::from_timestamp_millis(epoch)
            } else {
                DateTime::from_timestamp(epoch, 0)
            };
            Some(match parsed {
                Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
                None => n.to_string(),
            })
        }
        other => non_empty_text(other),
    }
}

/// The first key holding an array wins, even when the array is empty.
fn list_of<T>(obj: &Object, keys: &[&str], element: fn(&RawTree) -> T) -> Vec<T> {
    resolve(obj, keys, RawTree::as_array)
        .map(|items| items.iter().map(element).collect())
        .unwrap_or_default()
}

fn string_list(obj: &Object, keys: &[&str]) -> Vec<String> {
    resolve(obj, keys, RawTree::as_array)
        .map(|items| {
            items
                .iter()
                .filter(|v| !v.is_null())
                .map(stringify)
                .collect()
        })
        .unwrap_or_default()
}

fn action_item(value: &RawTree) -> ActionItem {
    match value {
        RawTree::Object(obj) => ActionItem {
            task: text_or(obj, TASK_KEYS, ""),
            owner: text_or(obj, OWNER_KEYS, DEFAULT_OWNER),
            category: text_or(obj, CATEGORY_KEYS, DEFAULT_CATEGORY),
        },
        other => ActionItem {
            task: stringify(other),
            owner: DEFAULT_OWNER.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
        },
    }
}

fn deadline(value: &RawTree) -> Deadline {
    match value {
        RawTree::Object(obj) => Deadline {
            item: text_or(obj, DEADLINE_ITEM_KEYS, ""),
            date: text_or(obj, DEADLINE_DATE_KEYS, ""),
        },
        other => Deadline {
            item: stringify(other),
            date: String::new(),
        },
    }
}

/// Render a scalar or nested value as display text.
fn stringify(value: &RawTree) -> String {
    match value {
        RawTree::Null => String::new(),
        RawTree::String(s) => s.clone(),
        RawTree::Bool(_) | RawTree::Number(_) | RawTree::Array(_) | RawTree::Object(_) => {
            value.to_string()
        }
    }
}

/// Row key for records the agent sent without an id. Unique enough within
/// one processing cycle, nothing more.
fn synthesize_id() -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut bits: u64 = rand::random();
    let token: String = (0..8)
        .map(|_| {
            let c = ALPHABET[(bits % 36) as usize] as char;
            bits /= 36;
            c
        })
        .collect();
    format!("email-{}", token)
}

pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_fields() {
        let raw = json!({
            "email_id": "sample-001",
            "sender": "Dr. Sarah Chen <s.chen@nyu.edu>",
            "subject": "URGENT: Azure AD Federation Migration",
            "date": "2026-02-23T09:15:00Z",
            "summary": "Emergency architecture review requested.",
            "technical_context": "Azure AD federation, SAML 2.0",
            "tone": "urgent",
            "priority_level": "Critical",
            "priority_rationale": "Production deadline Friday.",
            "urgency_signals": ["Production deadline Friday"],
            "action_items": [
                {"task": "Review SAML mapping", "owner": "IAM Team", "type": "technical"}
            ],
            "technical_decisions": ["Keep legacy IdP as fallback"],
            "deadlines": [{"item": "Change window", "date": "2026-02-27"}],
            "stakeholder_requests": ["Architecture review"],
            "system_references": ["Azure AD"],
            "reply_draft": "",
            "reply_tone": "professional",
            "key_points_addressed": [],
            "replied": false
        });
        let record = normalize_record(&raw);
        assert_eq!(record.email_id, "sample-001");
        assert_eq!(record.sender, "Dr. Sarah Chen <s.chen@nyu.edu>");
        assert_eq!(record.date, "2026-02-23T09:15:00Z");
        assert_eq!(record.priority_level, "Critical");
        assert_eq!(record.action_items[0].category, "technical");
        assert_eq!(record.deadlines[0].date, "2026-02-27");
        assert_eq!(record.reply_tone, "professional");
        assert_eq!(record.replied, Some(false));
    }

    #[test]
    fn test_aliases() {
        let raw = json!({
            "messageId": "m-1",
            "from": "ops@nyu.edu",
            "title": "Outage",
            "receivedAt": "yesterday",
            "snippet": "Core switch down",
            "technicalContext": "Cisco",
            "priority": "High",
            "priorityRationale": "Campus-wide",
            "urgencySignals": ["down"],
            "technicalDecisions": ["failover"],
            "stakeholderRequests": ["status page"],
            "systemReferences": ["core-sw-1"],
            "replyDraft": "On it.",
            "replyTone": "calm",
            "keyPointsAddressed": ["ack"]
        });
        let record = normalize_record(&raw);
        assert_eq!(record.email_id, "m-1");
        assert_eq!(record.sender, "ops@nyu.edu");
        assert_eq!(record.subject, "Outage");
        assert_eq!(record.date, "yesterday");
        assert_eq!(record.summary, "Core switch down");
        assert_eq!(record.technical_context, "Cisco");
        assert_eq!(record.priority_level, "High");
        assert_eq!(record.priority_rationale, "Campus-wide");
        assert_eq!(record.urgency_signals, vec!["down"]);
        assert_eq!(record.technical_decisions, vec!["failover"]);
        assert_eq!(record.stakeholder_requests, vec!["status page"]);
        assert_eq!(record.system_references, vec!["core-sw-1"]);
        assert_eq!(record.reply_draft, "On it.");
        assert_eq!(record.reply_tone, "calm");
        assert_eq!(record.key_points_addressed, vec!["ack"]);
    }

    #[test]
    fn test_canonical_name_beats_alias() {
        let raw = json!({"from": "alias@x.com", "sender": "canonical@x.com"});
        assert_eq!(normalize_record(&raw).sender, "canonical@x.com");
    }

    #[test]
    fn test_empty_or_wrong_shape_falls_through() {
        let raw = json!({"sender": "", "from": 42, "senderName": "Pat"});
        assert_eq!(normalize_record(&raw).sender, "Pat");
    }

    #[test]
    fn test_defaults() {
        let record = normalize_record(&json!({}));
        assert!(record.email_id.starts_with("email-"));
        assert_eq!(record.email_id.len(), "email-".len() + 8);
        assert_eq!(record.sender, DEFAULT_SENDER);
        assert_eq!(record.subject, DEFAULT_SUBJECT);
        assert_eq!(record.priority_level, DEFAULT_PRIORITY);
        assert!(DateTime::parse_from_rfc3339(&record.date).is_ok());
        assert!(record.summary.is_empty());
        assert!(record.action_items.is_empty());
        assert!(record.deadlines.is_empty());
        assert!(record.key_points_addressed.is_empty());
        assert_eq!(record.replied, None);
    }

    #[test]
    fn test_non_object_input_defaults() {
        for raw in [json!(null), json!("just text"), json!(7), json!([1, 2])] {
            let record = normalize_record(&raw);
            assert_eq!(record.sender, DEFAULT_SENDER);
            assert_eq!(record.subject, DEFAULT_SUBJECT);
        }
    }

    #[test]
    fn test_synthesized_ids_differ() {
        let a = normalize_record(&json!({"subject": "a"}));
        let b = normalize_record(&json!({"subject": "a"}));
        assert_ne!(a.email_id, b.email_id);
    }

    #[test]
    fn test_numeric_id() {
        assert_eq!(normalize_record(&json!({"id": 1234})).email_id, "1234");
    }

    #[test]
    fn test_zero_id_is_synthesized() {
        let record = normalize_record(&json!({"email_id": 0, "subject": "x"}));
        assert!(record.email_id.starts_with("email-"));

        let fallback = normalize_record(&json!({"email_id": 0, "id": "m-7"}));
        assert_eq!(fallback.email_id, "m-7");
    }

    #[test]
    fn test_epoch_dates() {
        let seconds = normalize_record(&json!({"date": 1_771_837_200}));
        assert_eq!(seconds.date, "2026-02-23T09:00:00.000Z");

        let millis = normalize_record(&json!({"timestamp": 1_771_837_200_000i64}));
        assert_eq!(millis.date, "2026-02-23T09:00:00.000Z");
    }

    #[test]
    fn test_out_of_range_epoch_dates_kept_as_text() {
        let min: RawTree = serde_json::from_str(r#"{"date": -9223372036854775808}"#).unwrap();
        assert_eq!(normalize_record(&min).date, "-9223372036854775808");

        let huge: RawTree = serde_json::from_str(r#"{"timestamp": -1e30}"#).unwrap();
        let record = normalize_record(&huge);
        assert!(!record.date.is_empty());
        assert!(record.date.starts_with('-'));
    }

    #[test]
    fn test_action_item_aliases_and_defaults() {
        let raw = json!({"action_items": [{"description": "call back", "assignee": "Bob"}]});
        let record = normalize_record(&raw);
        assert_eq!(
            record.action_items,
            vec![ActionItem {
                task: "call back".into(),
                owner: "Bob".into(),
                category: "task".into(),
            }]
        );
    }

    #[test]
    fn test_action_items_camel_case_and_scalars() {
        let raw = json!({"actionItems": [
            "Patch gateway",
            {"text": "Rotate keys", "category": "security"},
            null
        ]});
        let items = normalize_record(&raw).action_items;
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].task, "Patch gateway");
        assert_eq!(items[0].owner, DEFAULT_OWNER);
        assert_eq!(items[1].task, "Rotate keys");
        assert_eq!(items[1].category, "security");
        assert_eq!(items[2].task, "");
    }

    #[test]
    fn test_deadline_aliases() {
        let raw = json!({"deadlines": [
            {"description": "Grant submission", "due": "2026-04-15"},
            {"task": "Provisioning", "deadline": "2026-03-01"},
            "Friday"
        ]});
        let deadlines = normalize_record(&raw).deadlines;
        assert_eq!(
            deadlines[0],
            Deadline {
                item: "Grant submission".into(),
                date: "2026-04-15".into(),
            }
        );
        assert_eq!(deadlines[1].item, "Provisioning");
        assert_eq!(deadlines[1].date, "2026-03-01");
        assert_eq!(deadlines[2], Deadline { item: "Friday".into(), date: String::new() });
    }

    #[test]
    fn test_first_array_wins_even_if_empty() {
        let raw = json!({"urgency_signals": [], "urgencySignals": ["ignored"]});
        assert!(normalize_record(&raw).urgency_signals.is_empty());
    }

    #[test]
    fn test_string_list_elements() {
        let raw = json!({"system_references": ["Qualys", null, 3, true, {"name": "WAF"}]});
        assert_eq!(
            normalize_record(&raw).system_references,
            vec!["Qualys", "3", "true", "{\"name\":\"WAF\"}"]
        );
    }

    #[test]
    fn test_non_array_list_field_defaults() {
        let raw = json!({"urgency_signals": "soon", "action_items": {"task": "x"}});
        let record = normalize_record(&raw);
        assert!(record.urgency_signals.is_empty());
        assert!(record.action_items.is_empty());
    }

    #[test]
    fn test_normalizing_canonical_record_is_identity() {
        let raw = json!({
            "sender": "a@x.com",
            "subject": "Hi",
            "actionItems": [{"description": "call back", "assignee": "Bob"}],
            "deadlines": [{"item": "x", "due": "2026-03-01"}],
            "replied": true
        });
        let first = normalize_record(&raw);
        let second = normalize_record(&serde_json::to_value(&first).unwrap());
        assert_eq!(first, second);
    }
}
