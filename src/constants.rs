// src/constants.rs
//! Operational constants of the Notion API as this client uses it.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Base URL every request is sent under.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// The API version sent in the `Notion-Version` header.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. Queries default to it.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

pub const ENV_API_KEY: &str = "NOTION_API_KEY";
pub const ENV_BASE_URL: &str = "NOTION_API_BASE_URL";
pub const ENV_VERSION: &str = "NOTION_VERSION";
pub const ENV_TIMEOUT_SECS: &str = "NOTION_TIMEOUT_SECS";

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

/// How much of an unparseable response body is kept in error messages.
pub const RESPONSE_PREVIEW_LEN: usize = 500;
