//! Small accessors for walking untyped API JSON with typed errors.

use crate::error::{NotionDbError, Result};
use serde_json::{Map, Value as Json};

pub(crate) fn expect_object<'a>(value: &'a Json, what: &str) -> Result<&'a Map<String, Json>> {
    value
        .as_object()
        .ok_or_else(|| malformed(what, "an object", value))
}

pub(crate) fn expect_array<'a>(value: &'a Json, what: &str) -> Result<&'a Vec<Json>> {
    value
        .as_array()
        .ok_or_else(|| malformed(what, "an array", value))
}

pub(crate) fn optional_str<'a>(object: &'a Map<String, Json>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Json::as_str)
}

pub(crate) fn required_str<'a>(object: &'a Map<String, Json>, key: &str) -> Result<&'a str> {
    optional_str(object, key).ok_or_else(|| {
        NotionDbError::MalformedResponse(format!("missing string field '{}'", key))
    })
}

pub(crate) fn malformed(what: &str, expected: &str, found: &Json) -> NotionDbError {
    NotionDbError::MalformedResponse(format!(
        "expected {} for {}, found {}",
        expected,
        what,
        json_kind(found)
    ))
}

pub(crate) fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
