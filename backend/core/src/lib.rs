pub mod error;
pub mod hotel;
pub mod message;
pub mod traits;

pub use error::{DeliveryError, SearchError};
pub use hotel::{Hotel, SearchResult};
pub use message::{
    BubbleDocument, CarouselDocument, FlexAction, FlexBox, FlexButton, FlexComponent, FlexImage,
    FlexSpacer, FlexText, ReplyPayload,
};
pub use traits::{HotelSearch, ReplySender};
