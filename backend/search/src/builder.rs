use std::sync::Arc;

use tracing::{info, warn};

use hotelbot_core::{HotelSearch, ReplyPayload};
use hotelbot_logging::redact_sensitive_data;

use crate::render::{self, ReplyMode};

/// Turns a user keyword into the reply that answers it.
///
/// Search failures never surface: they are logged and answered with the same
/// text the API's own "no matches" answer produces.
#[derive(Clone)]
pub struct ReplyBuilder {
    search: Arc<dyn HotelSearch>,
    mode: ReplyMode,
}

impl ReplyBuilder {
    pub fn new(search: Arc<dyn HotelSearch>, mode: ReplyMode) -> Self {
        Self { search, mode }
    }

    pub async fn build_reply(&self, keyword: &str) -> ReplyPayload {
        match self.search.search(keyword).await {
            Ok(result) => {
                info!(
                    provider = self.search.name(),
                    hits = result.hotels().len(),
                    mode = %self.mode,
                    "Hotel search completed"
                );
                render::render(&result, self.mode)
            }
            Err(e) => {
                warn!(
                    provider = self.search.name(),
                    keyword = %redact_sensitive_data(keyword),
                    error = %e,
                    "Hotel search failed, replying with fallback"
                );
                render::no_results()
            }
        }
    }
}
