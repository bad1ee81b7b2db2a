use async_trait::async_trait;

use crate::error::{DeliveryError, SearchError};
use crate::hotel::SearchResult;
use crate::message::ReplyPayload;

/// Keyword search against a hotel catalogue.
#[async_trait]
pub trait HotelSearch: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Search for accommodations matching `keyword`.
    async fn search(&self, keyword: &str) -> Result<SearchResult, SearchError>;
}

/// Delivery of a reply to the messaging platform.
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Send `payload` as the answer to the event identified by `reply_token`.
    async fn send_reply(&self, reply_token: &str, payload: &ReplyPayload)
        -> Result<(), DeliveryError>;
}
