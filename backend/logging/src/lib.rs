//! Structured logging for the hotel search bot.
//!
//! Handles subscriber setup (console + optional rolling NDJSON file), log
//! redaction, and per-event bot outcome logging.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{BotEvent, BotEventEntry, EventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
