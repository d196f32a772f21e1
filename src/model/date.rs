//! ISO-8601 dates as Notion writes them.
//!
//! Literals are validated with chrono but stored verbatim, so a value read
//! from the API is sent back byte-for-byte.

use super::json::{expect_object, optional_str, required_str};
use crate::error::Result;
use crate::types::ValidationError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::{json, Value as Json};
use std::fmt;

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// A validated ISO-8601 date or date-time literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateLiteral(String);

impl DateLiteral {
    /// Accepts `YYYY-MM-DD`, RFC 3339 date-times, and date-times without an
    /// offset (which Notion pairs with a `time_zone`).
    pub fn parse(literal: &str) -> Result<Self, ValidationError> {
        let literal = literal.trim();
        if NaiveDate::parse_from_str(literal, "%Y-%m-%d").is_ok()
            || DateTime::parse_from_rfc3339(literal).is_ok()
            || Self::parse_naive_datetime(literal).is_some()
        {
            Ok(Self(literal.to_string()))
        } else {
            Err(ValidationError::InvalidDate {
                literal: literal.to_string(),
                reason: "expected YYYY-MM-DD or an ISO-8601 date-time".to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the literal carries a time of day.
    pub fn has_time(&self) -> bool {
        self.0.contains('T')
    }

    /// The calendar date, ignoring any time component.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.0.get(..10)?, "%Y-%m-%d").ok()
    }

    /// The instant, when the literal carries an explicit offset.
    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.0).ok()
    }

    fn parse_naive_datetime(literal: &str) -> Option<NaiveDateTime> {
        NAIVE_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(literal, format).ok())
    }
}

impl fmt::Display for DateLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DateLiteral {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DateLiteral {
    fn from(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }
}

impl From<NaiveDateTime> for DateLiteral {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime.format("%Y-%m-%dT%H:%M:%S%.3f").to_string())
    }
}

impl From<DateTime<Utc>> for DateLiteral {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self(datetime.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<DateTime<FixedOffset>> for DateLiteral {
    fn from(datetime: DateTime<FixedOffset>) -> Self {
        Self(datetime.to_rfc3339_opts(SecondsFormat::Millis, false))
    }
}

/// A date property value: a start, an optional end, and an optional IANA
/// time zone name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateValue {
    pub start: DateLiteral,
    pub end: Option<DateLiteral>,
    pub time_zone: Option<String>,
}

impl DateValue {
    pub fn new(start: impl Into<DateLiteral>) -> Self {
        Self {
            start: start.into(),
            end: None,
            time_zone: None,
        }
    }

    /// Builds a value from a literal string, validating it.
    pub fn parse(start: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(DateLiteral::parse(start)?))
    }

    pub fn with_end(mut self, end: impl Into<DateLiteral>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    pub fn is_range(&self) -> bool {
        self.end.is_some()
    }

    pub fn to_json(&self) -> Json {
        json!({
            "start": self.start.as_str(),
            "end": self.end.as_ref().map(DateLiteral::as_str),
            "time_zone": self.time_zone,
        })
    }

    pub fn from_json(value: &Json) -> Result<Self> {
        let object = expect_object(value, "date")?;
        let start = DateLiteral::parse(required_str(object, "start")?)?;
        let end = optional_str(object, "end")
            .map(DateLiteral::parse)
            .transpose()?;
        Ok(Self {
            start,
            end,
            time_zone: optional_str(object, "time_zone").map(str::to_string),
        })
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(time_zone) = &self.time_zone {
            write!(f, "{} ", time_zone)?;
        }
        write!(f, "{}", self.start)?;
        if let Some(end) = &self.end {
            write!(f, " to {}", end)?;
        }
        Ok(())
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self::new(date)
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::new(datetime)
    }
}

impl From<DateLiteral> for DateValue {
    fn from(literal: DateLiteral) -> Self {
        Self::new(literal)
    }
}
