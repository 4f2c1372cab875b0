// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adaptive card tree and the channel message payload that carries it.
//!
//! The card is serialized on its own and embedded as a string attachment in
//! the payload, so a payload is double-encoded on the wire:
//!
//! ```text
//! { "body": { "contentType": "html", "content": "<attachment id=\"1\"></attachment>" },
//!   "attachments": [ { "id": "1", "contentType": "...adaptive", "content": "{\"type\":\"AdaptiveCard\",...}" } ] }
//! ```

use crate::report::{ReportField, RunReport};
use crate::status::RunStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ADAPTIVE_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
pub const ADAPTIVE_CARD_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
pub const ADAPTIVE_CARD_VERSION: &str = "1.4";

/// Attachment id the message body points at.
pub const CARD_ATTACHMENT_ID: &str = "1";

#[derive(Debug, Error)]
pub enum CardError {
    #[error("card serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Weight {
    Default,
    Lighter,
    Bolder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Size {
    Default,
    Small,
    Medium,
    Large,
    ExtraLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Color {
    Default,
    Dark,
    Light,
    Accent,
    Good,
    Warning,
    Attention,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Spacing {
    None,
    Small,
    Default,
    Medium,
    Large,
    ExtraLarge,
    Padding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContainerStyle {
    Default,
    Emphasis,
    Good,
    Attention,
    Warning,
    Accent,
}

/// A node of the card body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardItem {
    TextBlock(TextBlock),
    Container(Container),
    ColumnSet(ColumnSet),
    Column(Column),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<Weight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<Spacing>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wrap: bool,
}

impl TextBlock {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), weight: None, size: None, color: None, spacing: None, wrap: false }
    }

    crate::setters! {
        set {
            wrap: bool,
        }
        option {
            weight: Weight,
            size: Size,
            color: Color,
            spacing: Spacing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub items: Vec<CardItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ContainerStyle>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bleed: bool,
}

impl Container {
    pub fn new(items: Vec<CardItem>) -> Self {
        Self { items, style: None, bleed: false }
    }

    crate::setters! {
        set {
            bleed: bool,
        }
        option {
            style: ContainerStyle,
        }
    }
}

/// Columns are stored as [`CardItem::Column`] so each one carries its type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSet {
    pub columns: Vec<CardItem>,
}

impl ColumnSet {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self { columns: columns.into_iter().map(CardItem::Column).collect() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub items: Vec<CardItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
}

impl Column {
    pub fn new(items: Vec<CardItem>) -> Self {
        Self { items, width: None }
    }

    crate::setters! {
        option {
            width: String,
        }
    }
}

macro_rules! card_item_from {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for CardItem {
                fn from(item: $variant) -> Self {
                    CardItem::$variant(item)
                }
            }
        )+
    };
}

card_item_from!(TextBlock, Container, ColumnSet, Column);

/// Self-contained adaptive card document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDocument {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub body: Vec<CardItem>,
}

impl CardDocument {
    pub fn new(body: Vec<CardItem>) -> Self {
        Self {
            kind: "AdaptiveCard".to_string(),
            schema: ADAPTIVE_CARD_SCHEMA.to_string(),
            version: ADAPTIVE_CARD_VERSION.to_string(),
            body,
        }
    }
}

// ── Payload envelope ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyContentType {
    Text,
    Html,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub content_type: BodyContentType,
    pub content: String,
}

impl MessageBody {
    pub fn html(content: impl Into<String>) -> Self {
        Self { content_type: BodyContentType::Html, content: content.into() }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self { content_type: BodyContentType::Text, content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub content_type: String,
    /// Serialized card document
    pub content: String,
}

/// A resolved user mention, referenced from the body by `<at id="{sequence_id}">`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireMention", from = "WireMention")]
pub struct Mention {
    pub sequence_id: u32,
    pub display_name: String,
    pub user_id: String,
}

impl Mention {
    /// Inline markup that renders this mention.
    pub fn markup(&self) -> String {
        format!("<at id=\"{}\">{}</at>", self.sequence_id, self.display_name)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMention {
    id: u32,
    mention_text: String,
    mentioned: WireMentioned,
}

#[derive(Serialize, Deserialize)]
struct WireMentioned {
    user: WireUser,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    display_name: String,
    id: String,
    user_identity_type: String,
}

impl From<Mention> for WireMention {
    fn from(m: Mention) -> Self {
        WireMention {
            id: m.sequence_id,
            mention_text: m.display_name.clone(),
            mentioned: WireMentioned {
                user: WireUser {
                    display_name: m.display_name,
                    id: m.user_id,
                    user_identity_type: "aadUser".to_string(),
                },
            },
        }
    }
}

impl From<WireMention> for Mention {
    fn from(w: WireMention) -> Self {
        Mention {
            sequence_id: w.id,
            display_name: w.mentioned.user.display_name,
            user_id: w.mentioned.user.id,
        }
    }
}

/// Message envelope posted to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub body: MessageBody,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<Mention>,
}

impl Payload {
    pub fn new(body: MessageBody) -> Self {
        Self { body, attachments: Vec::new(), mentions: Vec::new() }
    }

    /// Prefix the body with a ping line referencing `mentions`.
    ///
    /// The body becomes html. An empty list leaves the payload untouched.
    pub fn with_mentions(mut self, mentions: Vec<Mention>) -> Self {
        if mentions.is_empty() {
            return self;
        }
        let markup: Vec<String> = mentions.iter().map(Mention::markup).collect();
        self.body = MessageBody::html(format!(
            "<p>Ping {}</p><br><p>{}</p>",
            markup.join(", "),
            self.body.content
        ));
        self.mentions.extend(mentions);
        self
    }

    /// Decode the embedded card document, if the payload carries one.
    pub fn card_document(&self) -> Result<Option<CardDocument>, CardError> {
        self.attachments
            .iter()
            .find(|a| a.id == CARD_ATTACHMENT_ID)
            .map(|a| serde_json::from_str(&a.content))
            .transpose()
            .map_err(CardError::from)
    }

    pub fn to_json(&self) -> Result<String, CardError> {
        Ok(serde_json::to_string(self)?)
    }
}

// ── Builders ────────────────────────────────────────────────────────────

/// Text color for a rendered cell. Only the exact progress words are colored.
fn cell_color(text: &str) -> Color {
    match text {
        "errored" => Color::Attention,
        "skipped" => Color::Accent,
        "completed" => Color::Good,
        _ => Color::Default,
    }
}

/// One table column: a bold header followed by a cell per report row, in order.
pub fn build_column(report: &RunReport, field: ReportField) -> Vec<CardItem> {
    let header = TextBlock::new(field.to_string()).weight(Weight::Bolder);
    let cells = report.iter().map(|row| {
        let text = row.display(field);
        let color = cell_color(&text);
        TextBlock::new(text).color(color)
    });
    std::iter::once(header).chain(cells).map(CardItem::from).collect()
}

/// Wrap `items` in an accent container and embed the serialized card as the
/// payload's single attachment.
pub fn build_card(items: Vec<CardItem>) -> Result<Payload, CardError> {
    let container = Container::new(items).style(ContainerStyle::Accent).bleed(true);
    let document = CardDocument::new(vec![container.into()]);
    // Card is serialized on its own before it goes into the envelope
    let content = serde_json::to_string(&document)?;

    let mut payload = Payload::new(MessageBody::html(format!(
        "<attachment id=\"{CARD_ATTACHMENT_ID}\"></attachment>"
    )));
    payload.attachments.push(Attachment {
        id: CARD_ATTACHMENT_ID.to_string(),
        content_type: ADAPTIVE_CARD_CONTENT_TYPE.to_string(),
        content,
    });
    Ok(payload)
}

/// Status card for a project run: title, classified status, and a
/// name/progress/minutes table.
pub fn build_project_card(
    run_name: &str,
    project_name: &str,
    report: &RunReport,
) -> Result<Payload, CardError> {
    let status = RunStatus::classify(report);

    let title = TextBlock::new(format!("{project_name}/{run_name}"))
        .size(Size::Medium)
        .weight(Weight::Bolder);
    let headline = TextBlock::new(status.label.to_string())
        .size(Size::Large)
        .weight(Weight::Bolder)
        .color(status.color)
        .spacing(Spacing::None);
    let table = ColumnSet::new(
        [ReportField::Name, ReportField::Progress, ReportField::Minutes]
            .into_iter()
            .map(|field| Column::new(build_column(report, field))),
    );

    build_card(vec![title.into(), headline.into(), table.into()])
}

#[cfg(test)]
#[path = "card_tests.rs"]
mod tests;
