//! Reply Builder for the hotel search bot.
//!
//! Provides:
//! - `RakutenClient`: the keyword hotel search API client
//! - `render`: `SearchResult` to `ReplyPayload` conversion (flex carousel or plain text)
//! - `ReplyBuilder`: search + render, with the "no results" fallback

pub mod builder;
pub mod rakuten;
pub mod render;

pub use builder::ReplyBuilder;
pub use rakuten::{RakutenClient, SearchQuery, DEFAULT_ENDPOINT};
pub use render::{ReplyMode, NO_RESULTS_TEXT};
