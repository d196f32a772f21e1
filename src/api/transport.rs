// src/api/transport.rs
//! The HTTP boundary: one request in, one raw response out.
//!
//! Everything above this module works on [`ApiRequest`]/[`ApiResponse`]
//! values, so tests can swap the network for an in-memory [`Transport`].

use crate::config::ConnectorConfig;
use crate::error::{NotionDbError, Result, TransportError};
use crate::types::ApiKey;
use reqwest::blocking::Client;
use reqwest::{header, Method, StatusCode};
use serde_json::Value as Json;

/// A fully resolved request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL under the configured API base.
    pub url: String,
    pub body: Option<Json>,
}

/// Response body with its status and the URL it came from.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: StatusCode,
    pub url: String,
}

/// Sends requests to the Notion API.
///
/// Implementations attach credentials and report failures to reach the
/// server as [`TransportError`]. HTTP error statuses are not failures at
/// this level; they come back as responses.
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> std::result::Result<ApiResponse<String>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &ApiRequest) -> std::result::Result<ApiResponse<String>, TransportError> {
        (**self).send(request)
    }
}

/// Blocking reqwest transport with Notion authentication headers.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ConnectorConfig) -> Result<Self> {
        let mut builder =
            Client::builder().default_headers(Self::create_headers(&config.api_key, &config.notion_version)?);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey, notion_version: &str) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        let mut auth_value = header::HeaderValue::from_str(&auth_header).map_err(|e| {
            NotionDbError::MissingConfiguration(format!("Invalid API token format: {}", e))
        })?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_str(notion_version).map_err(|e| {
                NotionDbError::MissingConfiguration(format!("Invalid Notion-Version: {}", e))
            })?,
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> std::result::Result<ApiResponse<String>, TransportError> {
        let mut builder = self.client.request(request.method.clone(), &request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let response = builder.send()?;
        let status = response.status();
        let url = response.url().to_string();
        let data = response.text()?;
        Ok(ApiResponse { data, status, url })
    }
}
