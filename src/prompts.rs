//! Request messages sent to the email orchestrator agent.
//!
//! Only the text is built here; delivering it is the caller's job.

use crate::config::AgentSettings;
use crate::error::PromptError;
use crate::types::CanonicalRecord;

const DEFAULT_PROCESS_QUERY: &str = "Fetch and process my recent emails";

/// Output contract appended to every processing request so the response
/// carries the fields the normalizer looks for first.
const PROCESS_OUTPUT_CONTRACT: &str = "Summarize each email, extract key points and action \
items, and classify priority. Return the results as a JSON object with an \"emails\" array where \
each email has: email_id, sender, subject, date, summary, technical_context, tone, priority_level \
(Critical/High/Medium/Low), priority_rationale, urgency_signals, action_items (array of {task, \
owner, type}), technical_decisions, deadlines (array of {item, date}), stakeholder_requests, \
system_references, reply_draft, reply_tone, key_points_addressed. Also include total_emails, \
critical_count, high_count, and processing_timestamp at the top level.";

/// Build the inbox processing request.
pub fn build_process_message(settings: &AgentSettings) -> String {
    let query = if settings.default_query.trim().is_empty() {
        DEFAULT_PROCESS_QUERY
    } else {
        settings.default_query.trim()
    };

    let mut message = format!(
        "{}. {} Max emails: {}.",
        query, PROCESS_OUTPUT_CONTRACT, settings.max_emails
    );
    if !settings.vip_senders.trim().is_empty() {
        message.push_str(&format!(
            " VIP senders to prioritize: {}.",
            settings.vip_senders.trim()
        ));
    }
    if !settings.priority_keywords.trim().is_empty() {
        message.push_str(&format!(
            " Priority keywords: {}.",
            settings.priority_keywords.trim()
        ));
    }
    message
}

/// Build the request asking the agent to draft a reply to `record`.
pub fn build_reply_message(record: &CanonicalRecord) -> String {
    let key_points = if record.action_items.is_empty() {
        "None".to_string()
    } else {
        record
            .action_items
            .iter()
            .map(|a| a.task.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "Generate a professional reply for this email:\n\
         From: {}\n\
         Subject: {}\n\
         Summary: {}\n\
         Key Points: {}\n\
         Technical Context: {}\n\
         Priority: {}",
        record.sender,
        record.subject,
        record.summary,
        key_points,
        record.technical_context,
        record.priority_level,
    )
}

/// Build the request asking the agent to send `draft` as a reply to `record`.
pub fn build_send_reply_message(
    record: &CanonicalRecord,
    draft: &str,
) -> Result<String, PromptError> {
    if draft.trim().is_empty() {
        return Err(PromptError::EmptyDraft);
    }

    Ok(format!(
        "Send this reply to the email thread:\n\
         To: {}\n\
         Subject: Re: {}\n\
         Reply body: {}\n\
         Use GMAIL_REPLY_TO_THREAD to send this reply.",
        record.sender, record.subject, draft,
    ))
}
