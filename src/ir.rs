//! In-memory diagram model.
//!
//! A [`Drawing`] is an ordered list of [`Item`]s. Order is z-order: later items
//! are painted over earlier ones. Values are built once by [`crate::parser`]
//! (or directly in code) and only read afterwards.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Corners {
    Rounded,
    Sharp,
}

impl Corners {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "rounded" => Some(Self::Rounded),
            "sharp" => Some(Self::Sharp),
            _ => None,
        }
    }

    pub const TOKENS: &'static [&'static str] = &["rounded", "sharp"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "dotted" => Some(Self::Dotted),
            _ => None,
        }
    }

    pub const TOKENS: &'static [&'static str] = &["solid", "dashed", "dotted"];
}

/// Partial visual style. Every field may be unset, which means "use the
/// renderer default". An empty color string is kept as `Some("")`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corners: Option<Corners>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_thickness: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,
}

/// A rectangle with its top-left corner at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxItem {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

/// An ellipse inscribed in the bounding box at `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EllipseItem {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrowItem {
    pub start_x: i32,
    pub start_y: i32,
    pub end_x: i32,
    pub end_y: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    /// Arrowhead length in diagram units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_size: Option<u32>,
}

/// Content the upstream extraction step could not classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownText {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Box(BoxItem),
    Ellipse(EllipseItem),
    Arrow(ArrowItem),
    UnknownText(UnknownText),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Box(_) => ItemKind::Box,
            Item::Ellipse(_) => ItemKind::Ellipse,
            Item::Arrow(_) => ItemKind::Arrow,
            Item::UnknownText(_) => ItemKind::UnknownText,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Box,
    Ellipse,
    Arrow,
    UnknownText,
}

impl ItemKind {
    /// Maps an explicit element tag such as `"box"` or `"UnknownText"`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "box" => Some(Self::Box),
            "ellipse" => Some(Self::Ellipse),
            "arrow" => Some(Self::Arrow),
            "unknown_text" | "unknowntext" | "unknown" => Some(Self::UnknownText),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Box => "box",
            ItemKind::Ellipse => "ellipse",
            ItemKind::Arrow => "arrow",
            ItemKind::UnknownText => "unknown_text",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Drawing {
    pub items: Vec<Item>,
}

impl Drawing {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A small drawing with one item of every kind.
    pub fn sample() -> Self {
        Self {
            items: vec![
                Item::Box(BoxItem {
                    x: 50,
                    y: 50,
                    width: 100,
                    height: 100,
                    text: Some("Box".to_string()),
                    style: None,
                }),
                Item::Ellipse(EllipseItem {
                    x: 200,
                    y: 50,
                    width: 100,
                    height: 50,
                    text: Some("Ellipse".to_string()),
                    style: None,
                }),
                Item::Arrow(ArrowItem {
                    start_x: 50,
                    start_y: 200,
                    end_x: 150,
                    end_y: 250,
                    style: None,
                    head_size: Some(10),
                }),
                Item::UnknownText(UnknownText {
                    text: "This is some unknown text".to_string(),
                }),
            ],
        }
    }
}

impl<'de> Deserialize<'de> for Drawing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Drawing::from_value(&value).map_err(serde::de::Error::custom)
    }
}
