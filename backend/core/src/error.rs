use thiserror::Error;

/// Failure of the outbound hotel search call.
///
/// Never escalated past the reply builder: every variant is answered with
/// the same "no results" text reply.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request timed out")]
    Timeout,

    #[error("search request failed: {0}")]
    Request(String),

    #[error("search API returned status {status}")]
    Status { status: u16 },

    #[error("search response could not be decoded: {0}")]
    Decode(String),
}

/// Failure to hand a reply to the messaging platform.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("reply request failed: {0}")]
    Request(String),

    #[error("reply API returned status {status}: {body}")]
    Status { status: u16, body: String },
}
