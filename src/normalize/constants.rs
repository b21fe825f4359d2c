//! Wrapper keys and fallback texts shared by the response searches.

/// Wrapper keys searched for an email list, most specific first.
pub const RECORD_ENVELOPE_KEYS: &[&str] = &[
    "result", "response", "data", "output", "content", "message", "text",
];

/// Wrapper keys searched for counters and reply drafts.
pub const AGGREGATE_ENVELOPE_KEYS: &[&str] = &["result", "response", "data", "output"];

/// Field holding the email list in a well-formed payload.
pub const RECORDS_KEY: &str = "emails";

pub const NO_RECORDS_MESSAGE: &str = "No emails were returned. The agent may not have found \
any recent emails, or the response format was unexpected.";

pub const REPLY_FAILED_MESSAGE: &str = "Failed to generate reply. Please try again.";
