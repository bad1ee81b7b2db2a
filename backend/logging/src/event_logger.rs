//! Bot Event Logger
//!
//! One structured record per handled webhook event, with free text redacted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::redact::redact_sensitive_data;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotEvent {
    QueryReceived { user_id: Option<String>, keyword: String },
    ReplySent { reply_kind: String },
    ReplyFailed { error_msg: String },
    Ignored { event_kind: String },
}

#[derive(Debug, Serialize)]
pub struct BotEventEntry {
    pub reply_token: String,
    pub timestamp: DateTime<Utc>,
    pub event: BotEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Log a bot event, redacting user-supplied and remote text first.
    pub fn log_event(reply_token: &str, mut event: BotEvent) {
        match &mut event {
            BotEvent::QueryReceived { keyword, .. } => {
                *keyword = redact_sensitive_data(keyword);
            }
            BotEvent::ReplyFailed { error_msg } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            BotEvent::ReplySent { .. } | BotEvent::Ignored { .. } => {}
        }

        let failed = matches!(event, BotEvent::ReplyFailed { .. });
        let entry = BotEventEntry {
            reply_token: reply_token.into(),
            timestamp: Utc::now(),
            event,
        };
        let record = serde_json::to_string(&entry).unwrap_or_default();

        if failed {
            warn!(target: "bot_events", event = %record, "Bot event");
        } else {
            info!(target: "bot_events", event = %record, "Bot event");
        }
    }
}
