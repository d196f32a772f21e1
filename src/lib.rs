// src/lib.rs
//! notiondb library: typed access to Notion databases, rows and properties.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `NotionDbError`, `ColumnError`, `TransportError`
//! - **Configuration**: `ConnectorConfig`, logging setup
//! - **Domain model**: `Schema`, `SchemaProperty`, `Row`, `PropertyValue`, `Value`
//! - **Domain types**: `PageId`, `DatabaseId`, `ApiKey`, `PropertyName`, etc.
//! - **API client**: `Connector`, `Transport`, `Database`
//!
//! ```
//! use notiondb::{PropertyType, Row, Schema, Value};
//! use std::sync::Arc;
//!
//! let schema = Arc::new(
//!     Schema::from_columns([("Name", PropertyType::Title), ("Age", PropertyType::Number)])
//!         .unwrap(),
//! );
//! let row = Row::from_values(
//!     schema,
//!     [("Name", Value::from("John")), ("Age", Value::from(20))],
//! )
//! .unwrap();
//! assert_eq!(row.value("Age"), Some(Value::from(20)));
//! ```

#[cfg(feature = "bench")]
pub mod api;
#[cfg(not(feature = "bench"))]
mod api;

mod config;
mod constants;
mod database;
mod error;
mod logging;

#[cfg(feature = "bench")]
pub mod model;
#[cfg(not(feature = "bench"))]
mod model;

#[cfg(feature = "bench")]
pub mod types;
#[cfg(not(feature = "bench"))]
mod types;

// --- Error Handling ---
pub use crate::error::{ColumnError, NotionDbError, NotionErrorCode, Result, TransportError};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::ConnectorConfig;
pub use crate::constants::{NOTION_API_BASE_URL, NOTION_API_PAGE_SIZE, NOTION_API_VERSION};
pub use crate::logging::{build_logging_config, init_logging};

// --- Domain Model ---
pub use crate::model::{
    Annotations, DateLiteral, DateValue, FormulaResult, NumberFormat, PropertyConfig,
    PropertyData, PropertyType, PropertyTypeRegistry, PropertyValue, RelationKind, RichText,
    RichTextSpan, Row, Schema, SchemaProperty, SelectOption, SpanContent, UserRef, Value,
};

// --- Domain Types ---
pub use crate::types::{
    ApiKey, Color, DatabaseId, Id, PageId, PropertyId, PropertyName, UserId, ValidatedUrl,
};

// --- API Client ---
pub use crate::api::{
    fetch_all_pages, ApiRequest, ApiResponse, Connector, DatabaseInfo, HttpTransport,
    PaginatedResponse, PaginationResult, RowPage, RowQuery, Transport,
};
pub use crate::database::Database;
