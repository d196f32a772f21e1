//! Property values as they travel in page objects.
//!
//! [`PropertyData`] has one variant per supported [`PropertyType`] and an
//! `Opaque` variant for everything else. Two JSON forms exist:
//!
//! - the *full* form ([`PropertyValue::to_json`]) reproduces a response
//!   payload exactly, including option ids and colors, annotations and user
//!   details;
//! - the *write* form ([`PropertyData::payload`]) is what create/update
//!   requests carry: option names, minimal rich text, bare ids.

use super::date::{DateLiteral, DateValue};
use super::json::{expect_array, expect_object, json_kind, optional_str, required_str};
use super::property_type::PropertyType;
use super::rich_text::RichText;
use crate::error::{NotionDbError, Result};
use crate::types::{Color, PageId, PropertyId, UserId};
use serde_json::{json, Map, Number, Value as Json};

/// One choice of a select, multi-select or status column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub id: Option<String>,
    pub name: String,
    pub color: Option<Color>,
}

impl SelectOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Emits the keys that are set.
    pub fn to_json(&self) -> Json {
        let mut object = Map::new();
        if let Some(id) = &self.id {
            object.insert("id".into(), json!(id));
        }
        object.insert("name".into(), json!(self.name));
        if let Some(color) = self.color {
            object.insert("color".into(), json!(color.as_str()));
        }
        Json::Object(object)
    }

    pub fn from_json(value: &Json) -> Result<Self> {
        let object = expect_object(value, "select option")?;
        let color = optional_str(object, "color").map(str::parse).transpose()?;
        Ok(Self {
            id: optional_str(object, "id").map(str::to_string),
            name: required_str(object, "name")?.to_string(),
            color,
        })
    }
}

impl From<&str> for SelectOption {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SelectOption {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A user referenced by a people property.
///
/// Only the id is meaningful when writing; whatever else the API returned
/// (name, avatar, email) is kept in `details`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRef {
    pub id: UserId,
    pub details: Map<String, Json>,
}

impl UserRef {
    pub fn new(id: UserId) -> Self {
        let mut details = Map::new();
        details.insert("object".into(), json!("user"));
        Self { id, details }
    }

    pub fn name(&self) -> Option<&str> {
        optional_str(&self.details, "name")
    }

    fn to_json(&self) -> Json {
        let mut object = self.details.clone();
        object.insert("id".into(), json!(self.id.to_dashed()));
        Json::Object(object)
    }

    fn to_payload(&self) -> Json {
        json!({ "object": "user", "id": self.id.to_dashed() })
    }

    fn from_json(value: &Json) -> Result<Self> {
        let object = expect_object(value, "user")?;
        let id = UserId::parse(required_str(object, "id")?)?;
        let mut details = object.clone();
        details.remove("id");
        Ok(Self { id, details })
    }
}

/// The computed result of a formula property.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaResult {
    String(Option<String>),
    Number(Option<Number>),
    Boolean(Option<bool>),
    Date(Option<DateValue>),
}

impl FormulaResult {
    pub fn result_type(&self) -> &'static str {
        match self {
            FormulaResult::String(_) => "string",
            FormulaResult::Number(_) => "number",
            FormulaResult::Boolean(_) => "boolean",
            FormulaResult::Date(_) => "date",
        }
    }

    fn to_json(&self) -> Json {
        let inner = match self {
            FormulaResult::String(s) => json!(s),
            FormulaResult::Number(n) => json!(n),
            FormulaResult::Boolean(b) => json!(b),
            FormulaResult::Date(d) => d.as_ref().map(DateValue::to_json).unwrap_or(Json::Null),
        };
        let mut object = Map::new();
        object.insert("type".into(), json!(self.result_type()));
        object.insert(self.result_type().into(), inner);
        Json::Object(object)
    }

    fn from_json(value: &Json) -> Result<Self> {
        let object = expect_object(value, "formula")?;
        let kind = required_str(object, "type")?;
        let inner = object.get(kind).unwrap_or(&Json::Null);
        match kind {
            "string" => Ok(FormulaResult::String(nullable_string(inner, "formula string")?)),
            "number" => Ok(FormulaResult::Number(nullable_number(inner, "formula number")?)),
            "boolean" => match inner {
                Json::Null => Ok(FormulaResult::Boolean(None)),
                Json::Bool(b) => Ok(FormulaResult::Boolean(Some(*b))),
                other => Err(shape_mismatch("boolean", other)),
            },
            "date" => match inner {
                Json::Null => Ok(FormulaResult::Date(None)),
                other => Ok(FormulaResult::Date(Some(DateValue::from_json(other)?))),
            },
            other => Err(NotionDbError::MalformedResponse(format!(
                "unknown formula result type '{}'",
                other
            ))),
        }
    }
}

/// The typed payload of a property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyData {
    Title(RichText),
    RichText(RichText),
    Number(Option<Number>),
    Select(Option<SelectOption>),
    MultiSelect(Vec<SelectOption>),
    Status(Option<SelectOption>),
    Date(Option<DateValue>),
    People(Vec<UserRef>),
    /// `has_more` is set by the API when it truncated the relation list.
    Relation {
        pages: Vec<PageId>,
        has_more: Option<bool>,
    },
    Checkbox(bool),
    Url(Option<String>),
    Email(Option<String>),
    PhoneNumber(Option<String>),
    Formula(FormulaResult),
    CreatedTime(DateLiteral),
    LastEditedTime(DateLiteral),
    /// A value of a type this client does not model, kept verbatim.
    Opaque { type_tag: String, raw: Json },
}

impl PropertyData {
    /// The supported type of this value; `None` for opaque values.
    pub fn property_type(&self) -> Option<PropertyType> {
        let kind = match self {
            PropertyData::Title(_) => PropertyType::Title,
            PropertyData::RichText(_) => PropertyType::RichText,
            PropertyData::Number(_) => PropertyType::Number,
            PropertyData::Select(_) => PropertyType::Select,
            PropertyData::MultiSelect(_) => PropertyType::MultiSelect,
            PropertyData::Status(_) => PropertyType::Status,
            PropertyData::Date(_) => PropertyType::Date,
            PropertyData::People(_) => PropertyType::People,
            PropertyData::Relation { .. } => PropertyType::Relation,
            PropertyData::Checkbox(_) => PropertyType::Checkbox,
            PropertyData::Url(_) => PropertyType::Url,
            PropertyData::Email(_) => PropertyType::Email,
            PropertyData::PhoneNumber(_) => PropertyType::PhoneNumber,
            PropertyData::Formula(_) => PropertyType::Formula,
            PropertyData::CreatedTime(_) => PropertyType::CreatedTime,
            PropertyData::LastEditedTime(_) => PropertyType::LastEditedTime,
            PropertyData::Opaque { .. } => return None,
        };
        Some(kind)
    }

    /// The API type tag, including tags of opaque values.
    pub fn type_tag(&self) -> &str {
        match self {
            PropertyData::Opaque { type_tag, .. } => type_tag.as_str(),
            other => other.property_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }

    /// Whether this value may appear in a create/update request.
    pub fn is_writable(&self) -> bool {
        self.property_type().is_some_and(|t| !t.is_read_only())
    }

    /// The selected option names of select, multi-select and status values.
    pub fn selected_options(&self) -> Vec<&str> {
        match self {
            PropertyData::Select(option) | PropertyData::Status(option) => {
                option.iter().map(|o| o.name.as_str()).collect()
            }
            PropertyData::MultiSelect(options) => options.iter().map(|o| o.name.as_str()).collect(),
            _ => Vec::new(),
        }
    }

    /// The write form `{tag: body}`, or `None` for read-only and opaque
    /// values.
    pub fn payload(&self) -> Option<Json> {
        if !self.is_writable() {
            return None;
        }
        Some(self.tagged_write_json())
    }

    /// The write form for any supported value, read-only ones included.
    pub(crate) fn tagged_write_json(&self) -> Json {
        let mut object = Map::new();
        object.insert(self.type_tag().to_string(), self.write_body());
        Json::Object(object)
    }

    fn write_body(&self) -> Json {
        match self {
            PropertyData::Title(text) | PropertyData::RichText(text) => text.to_payload(),
            PropertyData::Select(option) | PropertyData::Status(option) => option
                .as_ref()
                .map(|o| json!({ "name": o.name }))
                .unwrap_or(Json::Null),
            PropertyData::MultiSelect(options) => Json::Array(
                options.iter().map(|o| json!({ "name": o.name })).collect(),
            ),
            PropertyData::People(users) => {
                Json::Array(users.iter().map(UserRef::to_payload).collect())
            }
            PropertyData::Relation { pages, .. } => Json::Array(
                pages
                    .iter()
                    .map(|id| json!({ "id": id.to_dashed() }))
                    .collect(),
            ),
            other => other.full_body(),
        }
    }

    fn full_body(&self) -> Json {
        match self {
            PropertyData::Title(text) | PropertyData::RichText(text) => text.to_json(),
            PropertyData::Number(n) => json!(n),
            PropertyData::Select(option) | PropertyData::Status(option) => option
                .as_ref()
                .map(SelectOption::to_json)
                .unwrap_or(Json::Null),
            PropertyData::MultiSelect(options) => {
                Json::Array(options.iter().map(SelectOption::to_json).collect())
            }
            PropertyData::Date(date) => date.as_ref().map(DateValue::to_json).unwrap_or(Json::Null),
            PropertyData::People(users) => Json::Array(users.iter().map(UserRef::to_json).collect()),
            PropertyData::Relation { pages, .. } => Json::Array(
                pages
                    .iter()
                    .map(|id| json!({ "id": id.to_dashed() }))
                    .collect(),
            ),
            PropertyData::Checkbox(b) => json!(b),
            PropertyData::Url(s) | PropertyData::Email(s) | PropertyData::PhoneNumber(s) => {
                json!(s)
            }
            PropertyData::Formula(result) => result.to_json(),
            PropertyData::CreatedTime(literal) | PropertyData::LastEditedTime(literal) => {
                json!(literal.as_str())
            }
            PropertyData::Opaque { raw, .. } => raw.clone(),
        }
    }

    /// Parses `{tag: body, ...}` for a known type. Works on both the write
    /// form and the full response form.
    pub fn from_payload(kind: PropertyType, value: &Json) -> Result<Self> {
        let object = expect_object(value, kind.as_str())?;
        let body = object.get(kind.as_str()).ok_or_else(|| {
            NotionDbError::MalformedResponse(format!(
                "property value has no '{}' field",
                kind.as_str()
            ))
        })?;

        let data = match kind {
            PropertyType::Title => PropertyData::Title(rich_text_body(body, kind)?),
            PropertyType::RichText => PropertyData::RichText(rich_text_body(body, kind)?),
            PropertyType::Number => PropertyData::Number(nullable_number(body, "number")?),
            PropertyType::Select => PropertyData::Select(nullable_option(body)?),
            PropertyType::Status => PropertyData::Status(nullable_option(body)?),
            PropertyType::MultiSelect => PropertyData::MultiSelect(
                array_body(body, kind)?
                    .iter()
                    .map(SelectOption::from_json)
                    .collect::<Result<_>>()?,
            ),
            PropertyType::Date => PropertyData::Date(match body {
                Json::Null => None,
                other => Some(DateValue::from_json(other)?),
            }),
            PropertyType::People => PropertyData::People(
                array_body(body, kind)?
                    .iter()
                    .map(UserRef::from_json)
                    .collect::<Result<_>>()?,
            ),
            PropertyType::Relation => PropertyData::Relation {
                pages: array_body(body, kind)?
                    .iter()
                    .map(|item| {
                        let item = expect_object(item, "relation item")?;
                        Ok(PageId::parse(required_str(item, "id")?)?)
                    })
                    .collect::<Result<_>>()?,
                has_more: object.get("has_more").and_then(Json::as_bool),
            },
            PropertyType::Checkbox => match body {
                Json::Bool(b) => PropertyData::Checkbox(*b),
                other => return Err(shape_mismatch("checkbox", other)),
            },
            PropertyType::Url => PropertyData::Url(nullable_string(body, "url")?),
            PropertyType::Email => PropertyData::Email(nullable_string(body, "email")?),
            PropertyType::PhoneNumber => {
                PropertyData::PhoneNumber(nullable_string(body, "phone_number")?)
            }
            PropertyType::Formula => PropertyData::Formula(FormulaResult::from_json(body)?),
            PropertyType::CreatedTime => PropertyData::CreatedTime(timestamp_body(body, kind)?),
            PropertyType::LastEditedTime => {
                PropertyData::LastEditedTime(timestamp_body(body, kind)?)
            }
        };
        Ok(data)
    }
}

/// A property value of a page: the data plus the property id Notion
/// assigned, when known.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    pub id: Option<PropertyId>,
    pub data: PropertyData,
}

impl PropertyValue {
    pub fn new(data: PropertyData) -> Self {
        Self { id: None, data }
    }

    pub fn property_type(&self) -> Option<PropertyType> {
        self.data.property_type()
    }

    pub fn type_tag(&self) -> &str {
        self.data.type_tag()
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self.data, PropertyData::Opaque { .. })
    }

    /// The full response form: `{"id", "type", tag: body}`.
    pub fn to_json(&self) -> Json {
        if let PropertyData::Opaque { raw, .. } = &self.data {
            return raw.clone();
        }
        let mut object = Map::new();
        if let Some(id) = &self.id {
            object.insert("id".into(), json!(id.as_str()));
        }
        object.insert("type".into(), json!(self.type_tag()));
        object.insert(self.type_tag().to_string(), self.data.full_body());
        if let PropertyData::Relation {
            has_more: Some(has_more),
            ..
        } = &self.data
        {
            object.insert("has_more".into(), json!(has_more));
        }
        Json::Object(object)
    }

    /// Parses a property value object from a page response, or a write-form
    /// `{tag: body}` object. Values of unsupported types are kept opaque.
    pub fn from_json(value: &Json) -> Result<Self> {
        let object = expect_object(value, "property value")?;
        let id = optional_str(object, "id").map(PropertyId::new);
        let type_tag = match optional_str(object, "type") {
            Some(tag) => tag,
            None => {
                let mut tags = object.keys().filter(|key| key.as_str() != "id");
                match (tags.next(), tags.next()) {
                    (Some(tag), None) => tag.as_str(),
                    _ => {
                        return Err(NotionDbError::MalformedResponse(
                            "property value has no 'type'".to_string(),
                        ))
                    }
                }
            }
        };

        let data = match type_tag.parse::<PropertyType>() {
            Ok(kind) => PropertyData::from_payload(kind, value)?,
            Err(_) => {
                log::warn!("Keeping value of unsupported property type '{}' opaque", type_tag);
                PropertyData::Opaque {
                    type_tag: type_tag.to_string(),
                    raw: value.clone(),
                }
            }
        };
        Ok(Self { id, data })
    }
}

impl From<PropertyData> for PropertyValue {
    fn from(data: PropertyData) -> Self {
        Self::new(data)
    }
}

fn shape_mismatch(expected: &str, found: &Json) -> NotionDbError {
    NotionDbError::TypeMismatch {
        column: None,
        expected: expected.to_string(),
        found: json_kind(found).to_string(),
    }
}

fn rich_text_body(body: &Json, kind: PropertyType) -> Result<RichText> {
    match body {
        Json::Array(_) => RichText::from_json(body),
        other => Err(shape_mismatch(kind.as_str(), other)),
    }
}

fn array_body(body: &Json, kind: PropertyType) -> Result<&Vec<Json>> {
    match body {
        Json::Array(_) => expect_array(body, kind.as_str()),
        other => Err(shape_mismatch(kind.as_str(), other)),
    }
}

fn nullable_number(body: &Json, expected: &str) -> Result<Option<Number>> {
    match body {
        Json::Null => Ok(None),
        Json::Number(n) => Ok(Some(n.clone())),
        other => Err(shape_mismatch(expected, other)),
    }
}

fn nullable_string(body: &Json, expected: &str) -> Result<Option<String>> {
    match body {
        Json::Null => Ok(None),
        Json::String(s) => Ok(Some(s.clone())),
        other => Err(shape_mismatch(expected, other)),
    }
}

fn nullable_option(body: &Json) -> Result<Option<SelectOption>> {
    match body {
        Json::Null => Ok(None),
        other => SelectOption::from_json(other).map(Some),
    }
}

fn timestamp_body(body: &Json, kind: PropertyType) -> Result<DateLiteral> {
    match body {
        Json::String(s) => Ok(DateLiteral::parse(s)?),
        other => Err(shape_mismatch(kind.as_str(), other)),
    }
}
