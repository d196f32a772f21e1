// src/api/mod.rs
//! Notion API interaction: the transport boundary, response parsing and the
//! typed [`Connector`] operations built on top of them.

mod client;
mod pagination;
pub mod parser;
mod transport;
mod types;

pub use client::Connector;
pub use pagination::fetch_all_pages;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Transport};
pub use types::{DatabaseInfo, PaginatedResponse, PaginationResult, RowPage, RowQuery};
