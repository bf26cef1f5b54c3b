use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of columns in the dashboard grid.
pub const GRID_COLUMNS: u8 = 12;
/// Narrowest span a half card may occupy.
pub const MIN_SPAN: u8 = 2;
/// Widest span a half card may occupy.
pub const MAX_SPAN: u8 = 10;
/// Span given to half cards dropped on a row boundary.
pub const DEFAULT_SPAN: u8 = 8;

/// Stable card identifier, preserved across reorders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Column span of a half card, always within `[MIN_SPAN, MAX_SPAN]`.
///
/// Out of range inputs are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i32", into = "u8")]
pub struct Span(u8);

impl Span {
    pub fn clamped(columns: i32) -> Self {
        Self(columns.clamp(i32::from(MIN_SPAN), i32::from(MAX_SPAN)) as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Columns left over in a 12-column row occupied by this span alone.
    pub const fn remaining(self) -> u8 {
        GRID_COLUMNS - self.0
    }
}

impl Default for Span {
    fn default() -> Self {
        Self(DEFAULT_SPAN)
    }
}

impl From<i32> for Span {
    fn from(value: i32) -> Self {
        Self::clamped(value)
    }
}

impl From<Span> for u8 {
    fn from(value: Span) -> Self {
        value.0
    }
}

/// Width class of a card. Only half cards carry a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardWidth {
    Full,
    Half(Span),
}

impl CardWidth {
    /// Columns the card occupies when rendered.
    pub const fn columns(self) -> u8 {
        match self {
            CardWidth::Full => GRID_COLUMNS,
            CardWidth::Half(span) => span.get(),
        }
    }

    pub const fn span(self) -> Option<Span> {
        match self {
            CardWidth::Full => None,
            CardWidth::Half(span) => Some(span),
        }
    }

    pub const fn is_half(self) -> bool {
        matches!(self, CardWidth::Half(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatData {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactsData {
    #[serde(default)]
    pub contacts: Vec<String>,
}

/// Card body keyed by card type.
///
/// The layout engine never looks inside; content renderers match on the known
/// variants and fall back to `Opaque` for anything else.
///
/// On the wire every variant is `{"type": kind, "data": ..}`, the same shape a
/// template carries, and reading it back goes through [`CardPayload::decode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "PayloadRecord", from = "PayloadRecord")]
pub enum CardPayload {
    Stat(StatData),
    Text(TextData),
    Chart(ChartData),
    Contacts(ContactsData),
    Opaque { kind: String, data: Value },
}

#[derive(Serialize, Deserialize)]
struct PayloadRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

impl From<CardPayload> for PayloadRecord {
    fn from(payload: CardPayload) -> Self {
        let kind = payload.kind().to_string();
        let data = match payload {
            CardPayload::Stat(stat) => serde_json::to_value(stat),
            CardPayload::Text(text) => serde_json::to_value(text),
            CardPayload::Chart(chart) => serde_json::to_value(chart),
            CardPayload::Contacts(contacts) => serde_json::to_value(contacts),
            CardPayload::Opaque { data, .. } => Ok(data),
        };
        Self {
            kind,
            data: data.unwrap_or(Value::Null),
        }
    }
}

impl From<PayloadRecord> for CardPayload {
    fn from(record: PayloadRecord) -> Self {
        CardPayload::decode(&record.kind, record.data)
    }
}

impl CardPayload {
    /// Decode template data for `kind`. Never fails: unknown kinds and data that
    /// does not match the known shape both end up as `Opaque`.
    pub fn decode(kind: &str, data: Value) -> Self {
        let known = match kind {
            "stat" => serde_json::from_value(data.clone()).ok().map(CardPayload::Stat),
            "text" => serde_json::from_value(data.clone()).ok().map(CardPayload::Text),
            "chart" => serde_json::from_value(data.clone()).ok().map(CardPayload::Chart),
            "contacts" => serde_json::from_value(data.clone())
                .ok()
                .map(CardPayload::Contacts),
            _ => None,
        };
        known.unwrap_or_else(|| CardPayload::Opaque {
            kind: kind.to_string(),
            data,
        })
    }

    pub fn blank() -> Self {
        CardPayload::Opaque {
            kind: "blank".to_string(),
            data: Value::Null,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            CardPayload::Stat(_) => "stat",
            CardPayload::Text(_) => "text",
            CardPayload::Chart(_) => "chart",
            CardPayload::Contacts(_) => "contacts",
            CardPayload::Opaque { kind, .. } => kind,
        }
    }

    /// Whether there is any body to render.
    pub fn is_present(&self) -> bool {
        !matches!(self, CardPayload::Opaque { data: Value::Null, .. })
    }
}

/// A layout-managed dashboard panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub title: String,
    pub width: CardWidth,
    pub payload: CardPayload,
}

impl Card {
    pub fn full(id: impl Into<CardId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            width: CardWidth::Full,
            payload: CardPayload::blank(),
        }
    }

    pub fn half(id: impl Into<CardId>, title: impl Into<String>, span: i32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            width: CardWidth::Half(Span::clamped(span)),
            payload: CardPayload::blank(),
        }
    }

    pub fn with_payload(mut self, payload: CardPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn kind(&self) -> &str {
        self.payload.kind()
    }

    pub fn is_half(&self) -> bool {
        self.width.is_half()
    }

    pub fn span(&self) -> Option<Span> {
        self.width.span()
    }

    /// Replace the span of a half card. Full cards are left untouched and
    /// `false` is returned.
    pub fn set_span(&mut self, span: Span) -> bool {
        match self.width {
            CardWidth::Half(_) => {
                self.width = CardWidth::Half(span);
                true
            }
            CardWidth::Full => false,
        }
    }
}
