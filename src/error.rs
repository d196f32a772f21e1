// src/error.rs
//! Error types for every failure the client can report.
//!
//! Each variant is a distinct, matchable kind: callers discriminate
//! unsupported types, schema violations, type mismatches, transport failures
//! and missing objects without inspecting message strings.

use crate::types::{PropertyName, ValidationError};
use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded: back off and retry
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error is transient and worth retrying.
    ///
    /// The client itself never retries; this is for callers that wrap it.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServiceUnavailable | Self::InternalError
        ) || matches!(self, Self::HttpStatus(502..=504))
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound | Self::HttpStatus(404))
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// One problem found while validating a row against a schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColumnError {
    #[error("column '{column}' is required but missing")]
    Missing { column: PropertyName },

    #[error("column '{column}' is not defined in the schema")]
    UnknownColumn { column: PropertyName },

    #[error("column '{column}' expects {expected} but holds {found}")]
    TypeMismatch {
        column: PropertyName,
        expected: String,
        found: String,
    },

    #[error("column '{column}' does not allow option '{option}'")]
    InvalidOption {
        column: PropertyName,
        option: String,
    },
}

impl ColumnError {
    /// The column this error is about.
    pub fn column(&self) -> &PropertyName {
        match self {
            Self::Missing { column }
            | Self::UnknownColumn { column }
            | Self::TypeMismatch { column, .. }
            | Self::InvalidOption { column, .. } => column,
        }
    }
}

/// Failure reported by the transport collaborator. Passed through untouched.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Main error type of the crate.
#[derive(Error, Debug)]
pub enum NotionDbError {
    #[error("Unsupported property type: {0}")]
    UnsupportedPropertyType(String),

    #[error("Schema validation failed: {}", join_column_errors(.0))]
    SchemaValidation(Vec<ColumnError>),

    #[error("Type mismatch{}: expected {expected}, got {found}", column_suffix(.column))]
    TypeMismatch {
        column: Option<PropertyName>,
        expected: String,
        found: String,
    },

    #[error("Property '{0}' is computed by Notion and cannot be written")]
    ReadOnlyProperty(PropertyName),

    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(PropertyName),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl NotionDbError {
    /// Per-column detail of a `SchemaValidation` error; empty otherwise.
    pub fn column_errors(&self) -> &[ColumnError] {
        match self {
            Self::SchemaValidation(errors) => errors,
            _ => &[],
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Attaches the column name to a type mismatch raised below the row
    /// level.
    pub(crate) fn on_column(self, column: &PropertyName) -> Self {
        match self {
            Self::TypeMismatch {
                column: None,
                expected,
                found,
            } => Self::TypeMismatch {
                column: Some(column.clone()),
                expected,
                found,
            },
            other => other,
        }
    }

    /// Re-labels an API "not found" answer as a missing `resource` with `id`.
    pub(crate) fn for_resource(self, resource: &'static str, id: impl fmt::Display) -> Self {
        match self {
            Self::NotionService { ref code, .. } if code.is_not_found() => Self::NotFound {
                resource,
                id: id.to_string(),
            },
            other => other,
        }
    }
}

impl From<reqwest::Error> for NotionDbError {
    fn from(err: reqwest::Error) -> Self {
        NotionDbError::Transport(TransportError::Http(err))
    }
}

impl From<serde_json::Error> for NotionDbError {
    fn from(err: serde_json::Error) -> Self {
        NotionDbError::MalformedResponse(err.to_string())
    }
}

fn join_column_errors(errors: &[ColumnError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn column_suffix(column: &Option<PropertyName>) -> String {
    match column {
        Some(column) => format!(" on column '{}'", column),
        None => String::new(),
    }
}

/// Result type alias for convenience
pub type Result<T, E = NotionDbError> = std::result::Result<T, E>;
