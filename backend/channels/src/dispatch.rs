use std::sync::Arc;

use hotelbot_core::ReplySender;
use hotelbot_logging::{BotEvent, EventLogger};
use hotelbot_search::ReplyBuilder;

use crate::line_receive::{LineEvent, LineMessage, MessageEvent, TextMessage};

/// Routes decoded webhook events to the reply builder.
///
/// Text messages get exactly one reply; every other event is dropped, as is
/// any message without a reply token (standby mode).
pub struct QueryDispatcher {
    builder: ReplyBuilder,
    sender: Arc<dyn ReplySender>,
}

impl QueryDispatcher {
    pub fn new(builder: ReplyBuilder, sender: Arc<dyn ReplySender>) -> Self {
        Self { builder, sender }
    }

    pub async fn dispatch(&self, event: &LineEvent) {
        match event {
            LineEvent::Message(MessageEvent {
                reply_token: Some(reply_token),
                source,
                message: LineMessage::Text(TextMessage { text, .. }),
            }) => {
                EventLogger::log_event(
                    reply_token,
                    BotEvent::QueryReceived {
                        user_id: source.as_ref().and_then(|s| s.user_id.clone()),
                        keyword: text.clone(),
                    },
                );
                let payload = self.builder.build_reply(text).await;
                // Delivery failures are recorded and swallowed; the webhook is still acknowledged.
                match self.sender.send_reply(reply_token, &payload).await {
                    Ok(()) => EventLogger::log_event(
                        reply_token,
                        BotEvent::ReplySent {
                            reply_kind: payload.kind().to_string(),
                        },
                    ),
                    Err(e) => EventLogger::log_event(
                        reply_token,
                        BotEvent::ReplyFailed {
                            error_msg: e.to_string(),
                        },
                    ),
                }
            }
            LineEvent::Message(MessageEvent { reply_token: None, .. }) => EventLogger::log_event(
                "",
                BotEvent::Ignored {
                    event_kind: "no_reply_token".into(),
                },
            ),
            LineEvent::Message(MessageEvent {
                reply_token: Some(reply_token),
                ..
            }) => EventLogger::log_event(
                reply_token,
                BotEvent::Ignored {
                    event_kind: "non_text_message".into(),
                },
            ),
            LineEvent::Other => EventLogger::log_event(
                "",
                BotEvent::Ignored {
                    event_kind: "other".into(),
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hotelbot_core::{
        DeliveryError, Hotel, HotelSearch, ReplyPayload, SearchError, SearchResult,
    };
    use hotelbot_search::{NO_RESULTS_TEXT, ReplyMode};
    use tokio::sync::Mutex;

    struct OneHotel;

    #[async_trait]
    impl HotelSearch for OneHotel {
        fn name(&self) -> &str {
            "one-hotel"
        }

        async fn search(&self, keyword: &str) -> Result<SearchResult, SearchError> {
            Ok(SearchResult::HotelList(vec![Hotel {
                name: format!("{keyword}ホテル"),
                information_url: "https://h.example".into(),
                ..Hotel::default()
            }]))
        }
    }

    #[derive(Default)]
    struct RecordingSender {
        sent: Mutex<Vec<(String, ReplyPayload)>>,
        fail: bool,
    }

    #[async_trait]
    impl ReplySender for RecordingSender {
        async fn send_reply(
            &self,
            reply_token: &str,
            payload: &ReplyPayload,
        ) -> Result<(), DeliveryError> {
            self.sent
                .lock()
                .await
                .push((reply_token.to_string(), payload.clone()));
            if self.fail {
                return Err(DeliveryError::Status {
                    status: 400,
                    body: "Invalid reply token".into(),
                });
            }
            Ok(())
        }
    }

    fn dispatcher(sender: Arc<RecordingSender>) -> QueryDispatcher {
        QueryDispatcher::new(ReplyBuilder::new(Arc::new(OneHotel), ReplyMode::Text), sender)
    }

    fn message(token: &str, message: LineMessage) -> LineEvent {
        LineEvent::Message(MessageEvent {
            reply_token: Some(token.into()),
            source: None,
            message,
        })
    }

    #[tokio::test]
    async fn text_message_gets_one_reply_on_its_token() {
        let sender = Arc::new(RecordingSender::default());
        let event = message(
            "token-1",
            LineMessage::Text(TextMessage {
                id: None,
                text: "渋谷".into(),
            }),
        );

        dispatcher(sender.clone()).dispatch(&event).await;

        let sent = sender.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "token-1");
        assert_eq!(sent[0].1, ReplyPayload::text("渋谷ホテル\nhttps://h.example\n\n"));
    }

    #[tokio::test]
    async fn non_message_and_non_text_events_are_ignored() {
        let sender = Arc::new(RecordingSender::default());
        let dispatcher = dispatcher(sender.clone());

        dispatcher.dispatch(&LineEvent::Other).await;
        dispatcher.dispatch(&message("token-2", LineMessage::Other)).await;

        assert!(sender.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn text_message_without_reply_token_is_skipped() {
        let sender = Arc::new(RecordingSender::default());
        let standby = LineEvent::Message(MessageEvent {
            reply_token: None,
            source: None,
            message: LineMessage::Text(TextMessage {
                id: None,
                text: "渋谷".into(),
            }),
        });

        dispatcher(sender.clone()).dispatch(&standby).await;

        assert!(sender.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let sender = Arc::new(RecordingSender {
            fail: true,
            ..RecordingSender::default()
        });
        let event = message(
            "expired",
            LineMessage::Text(TextMessage {
                id: None,
                text: "x".into(),
            }),
        );

        dispatcher(sender.clone()).dispatch(&event).await;

        assert_eq!(sender.sent.lock().await.len(), 1);
        assert_ne!(sender.sent.lock().await[0].1, ReplyPayload::text(NO_RESULTS_TEXT));
    }
}
