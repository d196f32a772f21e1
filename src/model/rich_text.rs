//! Rich text as it appears in title and rich_text properties.

use super::json::{expect_array, expect_object, optional_str, required_str};
use crate::error::{NotionDbError, Result};
use crate::types::Color;
use serde_json::{json, Map, Value as Json};
use std::fmt;

/// Formatting applied to a span of text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

impl Annotations {
    pub fn is_plain(&self) -> bool {
        *self == Annotations::default()
    }

    fn to_json(&self) -> Json {
        json!({
            "bold": self.bold,
            "italic": self.italic,
            "strikethrough": self.strikethrough,
            "underline": self.underline,
            "code": self.code,
            "color": self.color.as_str(),
        })
    }

    fn from_json(value: &Json) -> Result<Self> {
        let object = expect_object(value, "annotations")?;
        let flag = |key: &str| object.get(key).and_then(Json::as_bool).unwrap_or(false);
        let color = match optional_str(object, "color") {
            Some(color) => color.parse()?,
            None => Color::Default,
        };
        Ok(Self {
            bold: flag("bold"),
            italic: flag("italic"),
            strikethrough: flag("strikethrough"),
            underline: flag("underline"),
            code: flag("code"),
            color,
        })
    }
}

/// What a span carries.
#[derive(Debug, Clone, PartialEq)]
pub enum SpanContent {
    Text { content: String, link: Option<String> },
    Equation { expression: String },
    /// Mentions are kept as received; they are read-mostly and their shape
    /// varies per mentioned object.
    Mention(Json),
}

/// One segment of rich text.
#[derive(Debug, Clone, PartialEq)]
pub struct RichTextSpan {
    pub content: SpanContent,
    pub annotations: Annotations,
    pub plain_text: String,
    pub href: Option<String>,
}

impl RichTextSpan {
    /// An unformatted text span.
    pub fn text(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            plain_text: content.clone(),
            content: SpanContent::Text {
                content,
                link: None,
            },
            annotations: Annotations::default(),
            href: None,
        }
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Turns a text span into a link.
    pub fn with_link(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        if let SpanContent::Text { link, .. } = &mut self.content {
            *link = Some(url.clone());
            self.href = Some(url);
        }
        self
    }

    /// True for an unformatted, unlinked text span.
    pub fn is_plain(&self) -> bool {
        matches!(&self.content, SpanContent::Text { link: None, .. })
            && self.annotations.is_plain()
            && self.href.is_none()
    }

    fn to_json(&self) -> Json {
        let mut object = Map::new();
        match &self.content {
            SpanContent::Text { content, link } => {
                object.insert("type".into(), json!("text"));
                let link = link.as_ref().map(|url| json!({ "url": url }));
                object.insert("text".into(), json!({ "content": content, "link": link }));
            }
            SpanContent::Equation { expression } => {
                object.insert("type".into(), json!("equation"));
                object.insert("equation".into(), json!({ "expression": expression }));
            }
            SpanContent::Mention(mention) => {
                object.insert("type".into(), json!("mention"));
                object.insert("mention".into(), mention.clone());
            }
        }
        object.insert("annotations".into(), self.annotations.to_json());
        object.insert("plain_text".into(), json!(self.plain_text));
        object.insert("href".into(), json!(self.href));
        Json::Object(object)
    }

    /// The minimal write form: no `plain_text`/`href`, annotations only when
    /// they differ from the defaults.
    fn to_payload(&self) -> Json {
        let mut object = Map::new();
        match &self.content {
            SpanContent::Text { content, link } => {
                let mut text = Map::new();
                text.insert("content".into(), json!(content));
                if let Some(url) = link {
                    text.insert("link".into(), json!({ "url": url }));
                }
                object.insert("type".into(), json!("text"));
                object.insert("text".into(), Json::Object(text));
            }
            SpanContent::Equation { expression } => {
                object.insert("type".into(), json!("equation"));
                object.insert("equation".into(), json!({ "expression": expression }));
            }
            SpanContent::Mention(mention) => {
                object.insert("type".into(), json!("mention"));
                object.insert("mention".into(), mention.clone());
            }
        }
        if !self.annotations.is_plain() {
            object.insert("annotations".into(), self.annotations.to_json());
        }
        Json::Object(object)
    }

    fn from_json(value: &Json) -> Result<Self> {
        let object = expect_object(value, "rich text item")?;
        let kind = optional_str(object, "type").unwrap_or("text");
        let content = match kind {
            "text" => {
                let text = expect_object(
                    object.get("text").unwrap_or(&Json::Null),
                    "rich text 'text'",
                )?;
                let link = match text.get("link") {
                    Some(Json::Object(link)) => Some(required_str(link, "url")?.to_string()),
                    _ => None,
                };
                SpanContent::Text {
                    content: required_str(text, "content")?.to_string(),
                    link,
                }
            }
            "equation" => {
                let equation = expect_object(
                    object.get("equation").unwrap_or(&Json::Null),
                    "rich text 'equation'",
                )?;
                SpanContent::Equation {
                    expression: required_str(equation, "expression")?.to_string(),
                }
            }
            "mention" => SpanContent::Mention(object.get("mention").cloned().unwrap_or(Json::Null)),
            other => {
                return Err(NotionDbError::MalformedResponse(format!(
                    "unknown rich text type '{}'",
                    other
                )))
            }
        };

        let plain_text = match optional_str(object, "plain_text") {
            Some(text) => text.to_string(),
            None => match &content {
                SpanContent::Text { content, .. } => content.clone(),
                SpanContent::Equation { expression } => expression.clone(),
                SpanContent::Mention(_) => String::new(),
            },
        };
        let annotations = match object.get("annotations") {
            Some(value) if !value.is_null() => Annotations::from_json(value)?,
            _ => Annotations::default(),
        };
        let href = match object.get("href") {
            Some(Json::String(href)) => Some(href.clone()),
            _ => match &content {
                SpanContent::Text { link, .. } => link.clone(),
                _ => None,
            },
        };

        Ok(Self {
            content,
            annotations,
            plain_text,
            href,
        })
    }
}

/// A sequence of rich text spans. The empty sequence is the empty string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichText(Vec<RichTextSpan>);

impl RichText {
    /// Unformatted text; the empty string has no spans.
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            Self::default()
        } else {
            Self(vec![RichTextSpan::text(text)])
        }
    }

    pub fn from_spans(spans: Vec<RichTextSpan>) -> Self {
        Self(spans)
    }

    pub fn spans(&self) -> &[RichTextSpan] {
        &self.0
    }

    pub fn push(&mut self, span: RichTextSpan) {
        self.0.push(span);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenated plain text of every span.
    pub fn plain_text(&self) -> String {
        self.0.iter().map(|span| span.plain_text.as_str()).collect()
    }

    /// The text, if it carries no formatting, links, mentions or equations.
    pub fn as_plain(&self) -> Option<String> {
        if self.0.iter().all(RichTextSpan::is_plain) {
            Some(self.plain_text())
        } else {
            None
        }
    }

    pub fn to_json(&self) -> Json {
        Json::Array(self.0.iter().map(RichTextSpan::to_json).collect())
    }

    /// Write form used in create/update request bodies.
    pub fn to_payload(&self) -> Json {
        Json::Array(self.0.iter().map(RichTextSpan::to_payload).collect())
    }

    pub fn from_json(value: &Json) -> Result<Self> {
        let items = expect_array(value, "rich text")?;
        items
            .iter()
            .map(RichTextSpan::from_json)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.plain_text())
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for RichText {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}
