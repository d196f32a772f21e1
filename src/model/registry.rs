//! Conversions between native [`Value`]s and typed property data.
//!
//! Each supported type accepts a fixed set of native shapes; everything else
//! is a `TypeMismatch`. Nothing is coerced silently: numbers are not parsed
//! from text, text is not stringified from numbers.

use super::date::DateValue;
use super::property_type::PropertyType;
use super::property_value::{FormulaResult, PropertyData, SelectOption, UserRef};
use super::rich_text::RichText;
use super::value::Value;
use crate::error::{NotionDbError, Result};
use crate::types::{PageId, UserId};
use serde_json::Value as Json;

impl PropertyData {
    /// Builds typed data of `kind` from a native value.
    pub fn from_native(kind: PropertyType, value: &Value) -> Result<Self> {
        let data = match (kind, value) {
            (PropertyType::Title, Value::Text(text)) => PropertyData::Title(text.clone()),
            (PropertyType::Title, Value::Null) => PropertyData::Title(RichText::default()),
            (PropertyType::RichText, Value::Text(text)) => PropertyData::RichText(text.clone()),
            (PropertyType::RichText, Value::Null) => PropertyData::RichText(RichText::default()),

            (PropertyType::Number, Value::Number(n)) => PropertyData::Number(Some(n.clone())),
            (PropertyType::Number, Value::Null) => PropertyData::Number(None),

            (PropertyType::Select, _) => {
                PropertyData::Select(plain_text(kind, value)?.map(SelectOption::new))
            }
            (PropertyType::Status, _) => {
                PropertyData::Status(plain_text(kind, value)?.map(SelectOption::new))
            }
            (PropertyType::MultiSelect, Value::List(names)) => PropertyData::MultiSelect(
                names.iter().map(|name| SelectOption::new(name.as_str())).collect(),
            ),
            (PropertyType::MultiSelect, Value::Null) => PropertyData::MultiSelect(Vec::new()),

            (PropertyType::Date, Value::Date(date)) => PropertyData::Date(Some(date.clone())),
            (PropertyType::Date, Value::Null) => PropertyData::Date(None),

            // Ids are normalized: any form `Id::parse` accepts goes in, the
            // lowercase dashed form comes back out.
            (PropertyType::People, Value::List(ids)) => PropertyData::People(
                ids.iter()
                    .map(|id| Ok(UserRef::new(UserId::parse(id)?)))
                    .collect::<Result<_>>()?,
            ),
            (PropertyType::People, Value::Null) => PropertyData::People(Vec::new()),
            (PropertyType::Relation, Value::List(ids)) => PropertyData::Relation {
                pages: ids
                    .iter()
                    .map(|id| Ok(PageId::parse(id)?))
                    .collect::<Result<_>>()?,
                has_more: None,
            },
            (PropertyType::Relation, Value::Null) => PropertyData::Relation {
                pages: Vec::new(),
                has_more: None,
            },

            (PropertyType::Checkbox, Value::Bool(b)) => PropertyData::Checkbox(*b),

            (PropertyType::Url, _) => PropertyData::Url(plain_text(kind, value)?),
            (PropertyType::Email, _) => PropertyData::Email(plain_text(kind, value)?),
            (PropertyType::PhoneNumber, _) => PropertyData::PhoneNumber(plain_text(kind, value)?),

            (PropertyType::Formula, Value::Text(text)) => match text.as_plain() {
                Some(plain) => PropertyData::Formula(FormulaResult::String(Some(plain))),
                None => return Err(formatted_text(kind)),
            },
            (PropertyType::Formula, Value::Number(n)) => {
                PropertyData::Formula(FormulaResult::Number(Some(n.clone())))
            }
            (PropertyType::Formula, Value::Bool(b)) => {
                PropertyData::Formula(FormulaResult::Boolean(Some(*b)))
            }
            (PropertyType::Formula, Value::Date(date)) => {
                PropertyData::Formula(FormulaResult::Date(Some(date.clone())))
            }
            (PropertyType::Formula, Value::Null) => {
                PropertyData::Formula(FormulaResult::String(None))
            }

            // Timestamps are a single instant: no end, no separate time zone.
            (PropertyType::CreatedTime, Value::Date(date)) if is_instant(date) => {
                PropertyData::CreatedTime(date.start.clone())
            }
            (PropertyType::LastEditedTime, Value::Date(date)) if is_instant(date) => {
                PropertyData::LastEditedTime(date.start.clone())
            }

            (kind, value) => return Err(mismatch(kind, value)),
        };
        Ok(data)
    }

    /// The native view of this value. Opaque values have no native form and
    /// read as `Null`.
    pub fn to_native(&self) -> Value {
        match self {
            PropertyData::Title(text) | PropertyData::RichText(text) => Value::Text(text.clone()),
            PropertyData::Number(n) => n.clone().map(Value::Number).unwrap_or(Value::Null),
            PropertyData::Select(option) | PropertyData::Status(option) => option
                .as_ref()
                .map(|o| Value::from(o.name.as_str()))
                .unwrap_or(Value::Null),
            PropertyData::MultiSelect(options) => {
                Value::List(options.iter().map(|o| o.name.clone()).collect())
            }
            PropertyData::Date(date) => date.clone().map(Value::Date).unwrap_or(Value::Null),
            PropertyData::People(users) => {
                Value::List(users.iter().map(|u| u.id.to_dashed()).collect())
            }
            PropertyData::Relation { pages, .. } => {
                Value::List(pages.iter().map(PageId::to_dashed).collect())
            }
            PropertyData::Checkbox(b) => Value::Bool(*b),
            PropertyData::Url(s) | PropertyData::Email(s) | PropertyData::PhoneNumber(s) => {
                s.as_deref().map(Value::from).unwrap_or(Value::Null)
            }
            PropertyData::Formula(result) => match result {
                FormulaResult::String(s) => s.as_deref().map(Value::from).unwrap_or(Value::Null),
                FormulaResult::Number(n) => n.clone().map(Value::Number).unwrap_or(Value::Null),
                FormulaResult::Boolean(b) => b.map(Value::Bool).unwrap_or(Value::Null),
                FormulaResult::Date(d) => d.clone().map(Value::Date).unwrap_or(Value::Null),
            },
            PropertyData::CreatedTime(literal) | PropertyData::LastEditedTime(literal) => {
                Value::Date(DateValue::new(literal.clone()))
            }
            PropertyData::Opaque { .. } => Value::Null,
        }
    }
}

/// Option names, urls, emails and phone numbers: plain text only. The empty
/// string and `Null` clear the value.
fn plain_text(kind: PropertyType, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::Text(text) => match text.as_plain() {
            Some(plain) if plain.is_empty() => Ok(None),
            Some(plain) => Ok(Some(plain)),
            None => Err(formatted_text(kind)),
        },
        other => Err(mismatch(kind, other)),
    }
}

fn formatted_text(kind: PropertyType) -> NotionDbError {
    NotionDbError::TypeMismatch {
        column: None,
        expected: format!("plain text for {}", kind),
        found: "formatted text".to_string(),
    }
}

fn is_instant(date: &DateValue) -> bool {
    !date.is_range() && date.time_zone.is_none()
}

fn mismatch(kind: PropertyType, value: &Value) -> NotionDbError {
    NotionDbError::TypeMismatch {
        column: None,
        expected: kind.as_str().to_string(),
        found: value.kind_name().to_string(),
    }
}

/// Encodes native values into property JSON and back, by type.
///
/// `encode` produces the write form `{tag: body}`; `decode` accepts either
/// the write form or a full response object.
///
/// `decode(t, encode(t, v)) == v` holds for canonical values. People and
/// relation ids are the exception in one direction only: undashed or
/// uppercase ids are accepted and decode as lowercase dashed ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyTypeRegistry;

impl PropertyTypeRegistry {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, kind: PropertyType, value: &Value) -> Result<Json> {
        Ok(PropertyData::from_native(kind, value)?.tagged_write_json())
    }

    pub fn decode(&self, kind: PropertyType, payload: &Json) -> Result<Value> {
        Ok(PropertyData::from_payload(kind, payload)?.to_native())
    }

    /// Like [`decode`](Self::decode) with the type given as an API tag.
    pub fn decode_tagged(&self, type_tag: &str, payload: &Json) -> Result<Value> {
        let kind: PropertyType = type_tag.parse()?;
        self.decode(kind, payload)
    }
}
