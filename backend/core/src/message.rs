//! Reply payloads for the messaging platform.
//!
//! Every document type carries its own `"type"` tag so that nesting them
//! (a box inside a bubble inside a carousel) serializes to the flex message
//! JSON shape without any hand-built maps.

use serde::Serialize;

/// A single message handed to the reply API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyPayload {
    Text {
        text: String,
    },
    Flex {
        #[serde(rename = "altText")]
        alt_text: String,
        contents: CarouselDocument,
    },
}

impl ReplyPayload {
    pub fn text(text: impl Into<String>) -> Self {
        ReplyPayload::Text { text: text.into() }
    }

    /// Short name of the payload shape, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ReplyPayload::Text { .. } => "text",
            ReplyPayload::Flex { .. } => "flex",
        }
    }
}

/// Horizontally swipeable list of bubbles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "carousel")]
pub struct CarouselDocument {
    pub contents: Vec<BubbleDocument>,
}

/// One card of a carousel. `hero` is left out when there is no image to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "bubble")]
pub struct BubbleDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero: Option<FlexImage>,
    pub body: FlexBox,
    pub footer: FlexBox,
}

/// Any component that may appear inside a box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FlexComponent {
    Box(FlexBox),
    Text(FlexText),
    Button(FlexButton),
    Spacer(FlexSpacer),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "box", rename_all = "camelCase")]
pub struct FlexBox {
    pub layout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    pub contents: Vec<FlexComponent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
}

impl FlexBox {
    pub fn new(layout: &str, contents: Vec<FlexComponent>) -> Self {
        Self {
            layout: layout.to_string(),
            contents,
            ..Self::default()
        }
    }

    pub fn margin(mut self, margin: &str) -> Self {
        self.margin = Some(margin.to_string());
        self
    }

    pub fn spacing(mut self, spacing: &str) -> Self {
        self.spacing = Some(spacing.to_string());
        self
    }

    pub fn flex(mut self, flex: u32) -> Self {
        self.flex = Some(flex);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "text", rename_all = "camelCase")]
pub struct FlexText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<u32>,
}

impl FlexText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn weight(mut self, weight: &str) -> Self {
        self.weight = Some(weight.to_string());
        self
    }

    pub fn size(mut self, size: &str) -> Self {
        self.size = Some(size.to_string());
        self
    }

    pub fn wrap(mut self) -> Self {
        self.wrap = Some(true);
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn flex(mut self, flex: u32) -> Self {
        self.flex = Some(flex);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename = "image", rename_all = "camelCase")]
pub struct FlexImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<FlexAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "button", rename_all = "camelCase")]
pub struct FlexButton {
    pub style: String,
    pub height: String,
    pub action: FlexAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "spacer")]
pub struct FlexSpacer {
    pub size: String,
}

/// Tap action attached to an image or a button.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlexAction {
    Uri {
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        uri: String,
    },
}

impl FlexAction {
    pub fn uri(uri: impl Into<String>) -> Self {
        FlexAction::Uri {
            label: None,
            uri: uri.into(),
        }
    }

    pub fn labeled_uri(label: impl Into<String>, uri: impl Into<String>) -> Self {
        FlexAction::Uri {
            label: Some(label.into()),
            uri: uri.into(),
        }
    }
}
