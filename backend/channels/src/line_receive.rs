//! LINE Webhook Receiver
//!
//! Handles inbound payloads from LINE Messaging API webhooks,
//! including signature validation and event deserialization.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Reasons an inbound webhook is refused before any event is handled.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook signature is missing or invalid")]
    SignatureInvalid,

    #[error("webhook body is not a valid event envelope: {0}")]
    MalformedPayload(String),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        StatusCode::BAD_REQUEST.into_response()
    }
}

/// Top-level webhook envelope.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    /// Bot user ID the events were sent to.
    pub destination: Option<String>,
    pub events: Vec<LineEvent>,
}

/// A webhook event. Only message events are modelled; every other kind
/// (`follow`, `unfollow`, `postback`, `join`, ...) decodes to `Other`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LineEvent {
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Absent when the channel is in standby mode.
    pub reply_token: Option<String>,
    pub source: Option<EventSource>,
    pub message: LineMessage,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LineMessage {
    Text(TextMessage),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TextMessage {
    pub id: Option<String>,
    pub text: String,
}

/// Compute the `x-line-signature` value for `body`: base64 of HMAC-SHA256
/// keyed with the channel secret.
pub fn compute_signature(body: &[u8], channel_secret: &str) -> String {
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return String::new();
    };
    mac.update(body);
    BASE64.encode(mac.finalize().into_bytes())
}

/// Validates the `x-line-signature` against the local channel secret.
///
/// A missing (empty) header, an empty body, a header that is not base64,
/// and a digest mismatch are all plain `false`. The digest comparison is
/// constant time.
pub fn validate_signature(body: &[u8], signature: &str, channel_secret: &str) -> bool {
    if body.is_empty() || signature.is_empty() {
        return false;
    }
    let Ok(expected) = BASE64.decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(channel_secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Parse a webhook body into its events, in delivery order.
pub fn decode_events(body: &[u8]) -> Result<Vec<LineEvent>, WebhookError> {
    let envelope: WebhookEnvelope = serde_json::from_slice(body)
        .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;
    Ok(envelope.events)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "channel-secret";

    #[test]
    fn accepts_correct_signature() {
        let body = br#"{"events":[]}"#;
        let sig = compute_signature(body, SECRET);
        assert!(validate_signature(body, &sig, SECRET));
    }

    #[test]
    fn rejects_tampered_body() {
        let body = br#"{"events":[{"type":"follow"}]}"#;
        let sig = compute_signature(body, SECRET);
        let tampered = br#"{"events":[{"type":"unfollow"}]}"#;
        assert!(!validate_signature(tampered, &sig, SECRET));
    }

    #[test]
    fn rejects_wrong_secret_missing_header_and_empty_body() {
        let body = br#"{"events":[]}"#;
        let sig = compute_signature(body, SECRET);
        assert!(!validate_signature(body, &sig, "other-secret"));
        assert!(!validate_signature(body, "", SECRET));
        assert!(!validate_signature(b"", &compute_signature(b"", SECRET), SECRET));
        assert!(!validate_signature(body, "not base64 at all!", SECRET));
    }

    #[test]
    fn decodes_text_and_other_events_in_order() {
        let body = r#"{
            "destination": "Uxxxxxxxx",
            "events": [
                {
                    "type": "message",
                    "replyToken": "token-1",
                    "mode": "active",
                    "timestamp": 1700000000000,
                    "source": { "type": "user", "userId": "U123" },
                    "message": { "type": "text", "id": "m1", "text": "渋谷 ホテル" }
                },
                {
                    "type": "message",
                    "replyToken": "token-2",
                    "message": { "type": "sticker", "id": "m2", "packageId": "1", "stickerId": "1" }
                },
                { "type": "follow", "replyToken": "token-3" },
                { "type": "unsend", "unsend": { "messageId": "m0" } }
            ]
        }"#;

        let events = decode_events(body.as_bytes()).unwrap();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            LineEvent::Message(MessageEvent {
                reply_token: Some("token-1".into()),
                source: Some(EventSource {
                    user_id: Some("U123".into())
                }),
                message: LineMessage::Text(TextMessage {
                    id: Some("m1".into()),
                    text: "渋谷 ホテル".into(),
                }),
            })
        );
        match &events[1] {
            LineEvent::Message(ev) => assert_eq!(ev.message, LineMessage::Other),
            other => panic!("expected message event, got {other:?}"),
        }
        assert_eq!(events[2], LineEvent::Other);
        assert_eq!(events[3], LineEvent::Other);
    }

    #[test]
    fn standby_event_without_reply_token_does_not_break_the_batch() {
        let body = r#"{
            "destination": "Uxxxxxxxx",
            "events": [
                {
                    "type": "message",
                    "replyToken": "token-1",
                    "mode": "active",
                    "message": { "type": "text", "id": "m1", "text": "新宿" }
                },
                {
                    "type": "message",
                    "mode": "standby",
                    "message": { "type": "text", "id": "m2", "text": "池袋" }
                }
            ]
        }"#;

        let events = decode_events(body.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        match (&events[0], &events[1]) {
            (LineEvent::Message(active), LineEvent::Message(standby)) => {
                assert_eq!(active.reply_token.as_deref(), Some("token-1"));
                assert_eq!(standby.reply_token, None);
            }
            other => panic!("expected two message events, got {other:?}"),
        }
    }

    #[test]
    fn empty_event_list_is_valid() {
        assert!(decode_events(br#"{"destination":"U1","events":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        assert!(matches!(decode_events(b"not json"), Err(WebhookError::MalformedPayload(_))));
        assert!(matches!(decode_events(br#"{"destination":"U1"}"#), Err(WebhookError::MalformedPayload(_))));
        assert!(matches!(decode_events(br#"{"events":{}}"#), Err(WebhookError::MalformedPayload(_))));
    }
}
