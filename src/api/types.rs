// src/api/types.rs
//! Request and response shapes of the database and page endpoints.

use crate::error::Result;
use crate::model::{expect_object, optional_str, required_str, RichText, Row, Schema};
use crate::types::DatabaseId;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// One page of a paginated list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Everything collected by a pagination loop.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub total_fetched: usize,
    pub pages_fetched: u32,
}

/// Body of a database query: filter and sorts in Notion's own JSON form,
/// plus the cursor and page size.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Json>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Json) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: Json) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn start_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }
}

/// One page of query results, decoded into rows.
#[derive(Debug, Clone)]
pub struct RowPage {
    pub rows: Vec<Row>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// A database object: identity, title and schema.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseInfo {
    pub id: DatabaseId,
    pub title: RichText,
    pub url: Option<String>,
    pub archived: bool,
    pub schema: Schema,
}

impl DatabaseInfo {
    pub fn from_json(response: &Json) -> Result<Self> {
        let object = expect_object(response, "database")?;
        let title = match object.get("title") {
            Some(Json::Null) | None => RichText::default(),
            Some(title) => RichText::from_json(title)?,
        };
        Ok(Self {
            id: DatabaseId::parse(required_str(object, "id")?)?,
            title,
            url: optional_str(object, "url").map(str::to_string),
            archived: object
                .get("archived")
                .and_then(Json::as_bool)
                .unwrap_or(false),
            schema: Schema::from_api_response(response)?,
        })
    }
}
