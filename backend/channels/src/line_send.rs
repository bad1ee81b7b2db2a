//! LINE Senders
//!
//! Delivers reply payloads through the LINE Reply API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error};

use hotelbot_core::{DeliveryError, ReplyPayload, ReplySender};

pub const DEFAULT_API_BASE: &str = "https://api.line.me";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [ReplyPayload],
}

pub struct LineReplyClient {
    http: Client,
    api_base: String,
    channel_access_token: String,
}

impl LineReplyClient {
    pub fn new(channel_access_token: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            channel_access_token: channel_access_token.into(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ReplySender for LineReplyClient {
    async fn send_reply(
        &self,
        reply_token: &str,
        payload: &ReplyPayload,
    ) -> Result<(), DeliveryError> {
        let body = ReplyRequest {
            reply_token,
            messages: std::slice::from_ref(payload),
        };
        let res = self
            .http
            .post(format!("{}/v2/bot/message/reply", self.api_base))
            .bearer_auth(&self.channel_access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Request(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let err = res.text().await.unwrap_or_default();
            error!(status = status.as_u16(), "[LINE] Reply API rejected message");
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body: err,
            });
        }
        debug!(kind = payload.kind(), "[LINE] Reply delivered");
        Ok(())
    }
}
