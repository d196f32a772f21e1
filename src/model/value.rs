//! Native values: what callers read from and write into rows.

use super::date::{DateLiteral, DateValue};
use super::property_type::PropertyType;
use super::rich_text::RichText;
use crate::types::ValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Number;
use std::fmt;

/// A dynamically typed native value.
///
/// Every conversion into a column type goes through the registry and is
/// checked there; `Value` itself never converts between variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// Exact JSON number; integers stay integers.
    Number(Number),
    Text(RichText),
    /// Option names, page ids or user ids depending on the column.
    List(Vec<String>),
    Date(DateValue),
}

impl Value {
    /// A float value; NaN and infinities have no JSON representation.
    pub fn float(value: f64) -> Result<Self, ValidationError> {
        Number::from_f64(value)
            .map(Value::Number)
            .ok_or(ValidationError::NonFiniteNumber(value))
    }

    /// Short name of the variant, used in mismatch reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Date(_) => "date",
        }
    }

    /// The column type an untyped value is stored as on a row without a
    /// schema: text → rich_text, list → multi_select, bool → checkbox.
    pub fn inferred_type(&self) -> Option<PropertyType> {
        match self {
            Value::Null => None,
            Value::Bool(_) => Some(PropertyType::Checkbox),
            Value::Number(_) => Some(PropertyType::Number),
            Value::Text(_) => Some(PropertyType::RichText),
            Value::List(_) => Some(PropertyType::MultiSelect),
            Value::Date(_) => Some(PropertyType::Date),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(Number::as_f64)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    pub fn as_rich_text(&self) -> Option<&RichText> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Plain text of a text value.
    pub fn as_text(&self) -> Option<String> {
        self.as_rich_text().map(RichText::plain_text)
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateValue> {
        match self {
            Value::Date(date) => Some(date),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(text) => write!(f, "{}", text),
            Value::List(items) => write!(f, "{}", items.join(", ")),
            Value::Date(date) => write!(f, "{}", date),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! integer_into_value {
    ($($int:ty),*) => {
        $(
            impl From<$int> for Value {
                fn from(n: $int) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

integer_into_value!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(RichText::plain(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(RichText::plain(s))
    }
}

impl From<RichText> for Value {
    fn from(text: RichText) -> Self {
        Value::Text(text)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(str::to_string).collect())
    }
}

impl From<DateValue> for Value {
    fn from(date: DateValue) -> Self {
        Value::Date(date)
    }
}

impl From<DateLiteral> for Value {
    fn from(literal: DateLiteral) -> Self {
        Value::Date(DateValue::new(literal))
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::Date(DateValue::from(date))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(datetime: DateTime<Utc>) -> Self {
        Value::Date(DateValue::from(datetime))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inference_table() {
        assert_eq!(Value::from("John").inferred_type(), Some(PropertyType::RichText));
        assert_eq!(Value::from(20).inferred_type(), Some(PropertyType::Number));
        assert_eq!(Value::from(true).inferred_type(), Some(PropertyType::Checkbox));
        assert_eq!(
            Value::from(vec!["A", "B"]).inferred_type(),
            Some(PropertyType::MultiSelect)
        );
        assert_eq!(
            Value::from(Utc::now()).inferred_type(),
            Some(PropertyType::Date)
        );
        assert_eq!(Value::Null.inferred_type(), None);
    }

    #[test]
    fn test_numbers_keep_their_literal() {
        assert_eq!(Value::from(20).to_string(), "20");
        assert_eq!(Value::float(6.5).unwrap().to_string(), "6.5");
        assert_eq!(Value::from(20).as_i64(), Some(20));
        assert!(Value::float(f64::NAN).is_err());
        assert!(Value::float(f64::INFINITY).is_err());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i64>), Value::Null);
        assert_eq!(Value::from(Some("x")).as_text().as_deref(), Some("x"));
    }
}
