//! Rendering of search results into reply payloads.
//!
//! Two shapes are supported: a flex carousel with one bubble per hotel, and
//! a plain-text list of names and links. The "no results" text is shared by
//! both modes and by every search failure.

use std::fmt;
use std::str::FromStr;

use serde_json::Number;

use hotelbot_core::{
    BubbleDocument, CarouselDocument, FlexAction, FlexBox, FlexButton, FlexComponent, FlexImage,
    FlexSpacer, FlexText, Hotel, ReplyPayload, SearchResult,
};

pub const NO_RESULTS_TEXT: &str = "条件に該当する宿泊施設がみつかりません";
pub const FLEX_ALT_TEXT: &str = "宿泊検索の結果です";

const MAP_SEARCH_URL: &str = "https://www.google.com/maps?q=";
const LABEL_COLOR: &str = "#aaaaaa";
const VALUE_COLOR: &str = "#666666";

/// Which reply shape a hotel list is rendered into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyMode {
    #[default]
    Flex,
    Text,
}

impl ReplyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplyMode::Flex => "flex",
            ReplyMode::Text => "text",
        }
    }
}

impl fmt::Display for ReplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReplyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flex" => Ok(ReplyMode::Flex),
            "text" => Ok(ReplyMode::Text),
            other => Err(format!("unknown reply mode '{other}' (expected 'flex' or 'text')")),
        }
    }
}

pub fn no_results() -> ReplyPayload {
    ReplyPayload::text(NO_RESULTS_TEXT)
}

/// Render a search result in the given mode.
pub fn render(result: &SearchResult, mode: ReplyMode) -> ReplyPayload {
    match result {
        SearchResult::Error => no_results(),
        SearchResult::HotelList(hotels) if hotels.is_empty() => no_results(),
        SearchResult::HotelList(hotels) => match mode {
            ReplyMode::Flex => ReplyPayload::Flex {
                alt_text: FLEX_ALT_TEXT.to_string(),
                contents: carousel(hotels),
            },
            ReplyMode::Text => ReplyPayload::text(text_list(hotels)),
        },
    }
}

/// `<name>\n<url>\n\n` for every hotel, in order.
pub fn text_list(hotels: &[Hotel]) -> String {
    hotels
        .iter()
        .map(|hotel| format!("{}\n{}\n\n", hotel.name, hotel.information_url))
        .collect()
}

pub fn carousel(hotels: &[Hotel]) -> CarouselDocument {
    CarouselDocument {
        contents: hotels.iter().map(bubble).collect(),
    }
}

pub fn bubble(hotel: &Hotel) -> BubbleDocument {
    BubbleDocument {
        hero: hero(hotel),
        body: body(hotel),
        footer: footer(hotel),
    }
}

pub fn address_text(hotel: &Hotel) -> String {
    format!("{}{}", hotel.address1, hotel.address2)
}

pub fn price_text(hotel: &Hotel) -> String {
    format!("￥{}〜", number_text(&hotel.min_charge))
}

pub fn map_url(hotel: &Hotel) -> String {
    format!(
        "{MAP_SEARCH_URL}{}{}",
        number_text(&hotel.latitude),
        number_text(&hotel.longitude)
    )
}

pub fn tel_uri(hotel: &Hotel) -> String {
    format!("tel:{}", hotel.telephone_no)
}

fn number_text(value: &Option<Number>) -> String {
    value.as_ref().map(Number::to_string).unwrap_or_default()
}

/// No hero without an image URL; an empty `url` is rejected by the Reply API.
fn hero(hotel: &Hotel) -> Option<FlexImage> {
    if hotel.image_url.is_empty() {
        return None;
    }
    let action = (!hotel.information_url.is_empty())
        .then(|| FlexAction::uri(hotel.information_url.clone()));
    Some(FlexImage {
        url: hotel.image_url.clone(),
        size: Some("full".into()),
        aspect_ratio: Some("20:13".into()),
        aspect_mode: Some("cover".into()),
        action,
    })
}

fn body(hotel: &Hotel) -> FlexBox {
    let name = FlexText::new(hotel.name.clone())
        .weight("bold")
        .size("md")
        .wrap();
    let rows = FlexBox::new(
        "vertical",
        vec![
            labeled_row("住所", address_text(hotel)),
            labeled_row("料金", price_text(hotel)),
        ],
    )
    .margin("lg")
    .spacing("sm");

    FlexBox::new(
        "vertical",
        vec![FlexComponent::Text(name), FlexComponent::Box(rows)],
    )
}

fn labeled_row(label: &str, value: String) -> FlexComponent {
    let label = FlexText::new(label).color(LABEL_COLOR).size("sm").flex(1);
    let value = FlexText::new(value)
        .wrap()
        .color(VALUE_COLOR)
        .size("sm")
        .flex(5);
    FlexComponent::Box(
        FlexBox::new(
            "baseline",
            vec![FlexComponent::Text(label), FlexComponent::Text(value)],
        )
        .spacing("sm"),
    )
}

fn footer(hotel: &Hotel) -> FlexBox {
    let mut contents = Vec::with_capacity(3);
    // A bare `tel:` is not a valid action URI.
    if !hotel.telephone_no.is_empty() {
        contents.push(link_button("電話する", tel_uri(hotel)));
    }
    contents.push(link_button("地図を見る", map_url(hotel)));
    contents.push(FlexComponent::Spacer(FlexSpacer { size: "sm".into() }));

    FlexBox::new("vertical", contents).spacing("sm").flex(0)
}

fn link_button(label: &str, uri: String) -> FlexComponent {
    FlexComponent::Button(FlexButton {
        style: "link".into(),
        height: "sm".into(),
        action: FlexAction::labeled_uri(label, uri),
    })
}
