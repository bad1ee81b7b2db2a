//! LINE Messaging API channel for the hotel search bot.
//!
//! - `line_receive`: webhook signature validation and event decoding
//! - `dispatch`: filtering of decoded events down to text queries
//! - `line_send`: delivery through the Reply API
//! - `line`: the axum router tying the three together

pub mod dispatch;
pub mod line;
pub mod line_receive;
pub mod line_send;

pub use dispatch::QueryDispatcher;
pub use line::{LineAdapter, LineConfig};
pub use line_receive::{WebhookError, decode_events, validate_signature};
pub use line_send::LineReplyClient;
