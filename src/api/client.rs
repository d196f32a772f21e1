// src/api/client.rs
//! The connector: typed operations over the database and page endpoints.

use super::pagination::fetch_all_pages;
use super::parser::parse_api_response;
use super::transport::{ApiRequest, HttpTransport, Transport};
use super::types::{DatabaseInfo, PaginatedResponse, RowPage, RowQuery};
use crate::config::ConnectorConfig;
use crate::error::{NotionDbError, Result};
use crate::model::{Row, Schema};
use crate::types::{ApiKey, DatabaseId, PageId, ValidatedUrl};
use reqwest::Method;
use serde_json::{json, Map, Value as Json};
use std::sync::Arc;

/// Client for the Notion database API.
///
/// Every call is one synchronous request. The connector keeps no state
/// between calls; it only holds the transport and the API base URL.
pub struct Connector<T: Transport = HttpTransport> {
    transport: T,
    base_url: ValidatedUrl,
}

impl Connector<HttpTransport> {
    /// A connector for the public API authenticated with `api_key`.
    pub fn new(api_key: ApiKey) -> Result<Self> {
        Self::from_config(ConnectorConfig::new(api_key))
    }

    pub fn from_config(config: ConnectorConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.base_url))
    }

    /// A connector configured from `NOTION_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ConnectorConfig::from_env()?)
    }
}

impl<T: Transport> Connector<T> {
    pub fn with_transport(transport: T, base_url: ValidatedUrl) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    pub fn base_url(&self) -> &ValidatedUrl {
        &self.base_url
    }

    /// Sends an arbitrary request to the API.
    ///
    /// `endpoint` is either relative to the API base (`"users/me"`,
    /// `"/search"`) or an absolute URL under it; anything else is refused
    /// before it reaches the network, so the credential never leaves the API.
    pub fn request(&self, method: Method, endpoint: &str, body: Option<Json>) -> Result<Json> {
        let url = self.resolve(endpoint)?;
        self.execute(method, url, body)
    }

    fn resolve(&self, endpoint: &str) -> Result<String> {
        let base = self.base_url.trimmed();
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            let under_base = endpoint
                .strip_prefix(base)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'));
            if under_base {
                Ok(endpoint.to_string())
            } else {
                Err(NotionDbError::InvalidRequest(format!(
                    "refusing to send a request outside {}: {}",
                    base, endpoint
                )))
            }
        } else {
            Ok(format!("{}/{}", base, endpoint.trim_start_matches('/')))
        }
    }

    fn execute(&self, method: Method, url: String, body: Option<Json>) -> Result<Json> {
        log::debug!("{} {}", method, url);
        let request = ApiRequest { method, url, body };
        let response = self.transport.send(&request)?;
        log::debug!("{} {} -> {}", request.method, response.url, response.status);
        parse_api_response(response)
    }

    // Databases
    // ---------------------

    /// `GET /databases/{id}`
    pub fn retrieve_database(&self, id: &DatabaseId) -> Result<DatabaseInfo> {
        let response = self
            .request(Method::GET, &format!("databases/{}", id.to_dashed()), None)
            .map_err(|e| e.for_resource("database", id))?;
        DatabaseInfo::from_json(&response)
    }

    /// The schema of a database.
    pub fn fetch_schema(&self, id: &DatabaseId) -> Result<Schema> {
        Ok(self.retrieve_database(id)?.schema)
    }

    /// `POST /databases`: creates a database under a page. The schema must
    /// have a title column.
    pub fn create_database(
        &self,
        parent: &PageId,
        title: &str,
        schema: &Schema,
        cover: Option<&ValidatedUrl>,
    ) -> Result<DatabaseInfo> {
        if schema.title_column().is_none() {
            return Err(NotionDbError::InvalidRequest(
                "a database needs exactly one title column".to_string(),
            ));
        }

        let mut body = Map::new();
        body.insert(
            "parent".into(),
            json!({ "type": "page_id", "page_id": parent.to_dashed() }),
        );
        body.insert("title".into(), title_json(title));
        body.insert("properties".into(), schema.to_api_properties());
        if let Some(cover) = cover {
            body.insert(
                "cover".into(),
                json!({ "type": "external", "external": { "url": cover.as_str() } }),
            );
        }

        let response = self
            .request(Method::POST, "databases", Some(Json::Object(body)))
            .map_err(|e| e.for_resource("page", parent))?;
        let info = DatabaseInfo::from_json(&response)?;
        log::info!("Created database {} under page {}", info.id, parent);
        Ok(info)
    }

    /// `PATCH /databases/{id}`: sends every column of `schema`, keyed by
    /// column id where known, and an optional new title.
    pub fn update_database(
        &self,
        id: &DatabaseId,
        schema: &Schema,
        title: Option<&str>,
    ) -> Result<DatabaseInfo> {
        self.patch_database(id, schema.to_update_properties(None), title)
    }

    pub(crate) fn patch_database(
        &self,
        id: &DatabaseId,
        properties: Json,
        title: Option<&str>,
    ) -> Result<DatabaseInfo> {
        let mut body = Map::new();
        body.insert("properties".into(), properties);
        if let Some(title) = title {
            body.insert("title".into(), title_json(title));
        }
        let response = self
            .request(
                Method::PATCH,
                &format!("databases/{}", id.to_dashed()),
                Some(Json::Object(body)),
            )
            .map_err(|e| e.for_resource("database", id))?;
        DatabaseInfo::from_json(&response)
    }

    /// `POST /databases/{id}/query`: one page of results, decoded against
    /// `schema`.
    pub fn query_rows(
        &self,
        id: &DatabaseId,
        query: &RowQuery,
        schema: &Arc<Schema>,
    ) -> Result<RowPage> {
        let body = serde_json::to_value(query)?;
        let response = self
            .request(
                Method::POST,
                &format!("databases/{}/query", id.to_dashed()),
                Some(body),
            )
            .map_err(|e| e.for_resource("database", id))?;
        let page: PaginatedResponse<Json> = serde_json::from_value(response)?;
        let rows = page
            .results
            .iter()
            .map(|result| Row::from_api_response(result, Arc::clone(schema)))
            .collect::<Result<Vec<_>>>()?;
        Ok(RowPage {
            rows,
            next_cursor: page.next_cursor,
            has_more: page.has_more,
        })
    }

    /// Follows cursors from `query.start_cursor` until the last page, or
    /// until `max_pages` pages were read.
    pub fn query_all_rows(
        &self,
        id: &DatabaseId,
        query: &RowQuery,
        schema: &Arc<Schema>,
        max_pages: Option<u32>,
    ) -> Result<Vec<Row>> {
        let mut first_cursor = query.start_cursor.clone();
        let result = fetch_all_pages(
            |page_size, cursor| {
                let page_query = RowQuery {
                    start_cursor: cursor.or_else(|| first_cursor.take()),
                    page_size: Some(page_size),
                    ..query.clone()
                };
                let page = self.query_rows(id, &page_query, schema)?;
                Ok(PaginatedResponse {
                    object: "list".to_string(),
                    results: page.rows,
                    next_cursor: page.next_cursor,
                    has_more: page.has_more,
                })
            },
            query.page_size,
            max_pages,
        )?;
        log::debug!(
            "Fetched {} rows of database {} in {} pages",
            result.total_fetched,
            id,
            result.pages_fetched
        );
        Ok(result.items)
    }

    // Pages
    // ---------------------

    /// `GET /pages/{id}`, decoded against `schema`.
    pub fn retrieve_row(&self, id: &PageId, schema: Arc<Schema>) -> Result<Row> {
        let response = self
            .request(Method::GET, &format!("pages/{}", id.to_dashed()), None)
            .map_err(|e| e.for_resource("row", id))?;
        Row::from_api_response(&response, schema)
    }

    /// `POST /pages`: adds a row to a database. Bound rows are validated
    /// first. The returned row carries the new page id and is bound to the
    /// same schema as `row`, or unbound if `row` was.
    pub fn create_row(&self, database_id: &DatabaseId, row: &Row) -> Result<Row> {
        row.validate()?;
        let mut body = row.to_api_payload();
        if let Some(object) = body.as_object_mut() {
            object.insert(
                "parent".into(),
                json!({ "database_id": database_id.to_dashed() }),
            );
        }
        let response = self
            .request(Method::POST, "pages", Some(body))
            .map_err(|e| e.for_resource("database", database_id))?;
        Row::from_page(&response, row.schema().cloned())
    }

    /// `PATCH /pages/{id}`: writes the row's values to its page.
    pub fn update_row(&self, row: &Row) -> Result<Row> {
        let id = row.id().ok_or_else(|| {
            NotionDbError::InvalidRequest("cannot update a row that has no page id".to_string())
        })?;
        row.validate()?;
        let response = self
            .request(
                Method::PATCH,
                &format!("pages/{}", id.to_dashed()),
                Some(row.to_api_payload()),
            )
            .map_err(|e| e.for_resource("row", id))?;
        Row::from_page(&response, row.schema().cloned())
    }

    /// Archives (soft-deletes) a row's page.
    pub fn archive_row(&self, id: &PageId) -> Result<()> {
        self.request(
            Method::PATCH,
            &format!("pages/{}", id.to_dashed()),
            Some(json!({ "archived": true })),
        )
        .map_err(|e| e.for_resource("row", id))?;
        Ok(())
    }
}

fn title_json(title: &str) -> Json {
    json!([{ "type": "text", "text": { "content": title } }])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::ApiResponse;
    use crate::error::TransportError;
    use reqwest::StatusCode;
    use std::cell::RefCell;

    /// Answers every request with `{}` and remembers the URLs.
    #[derive(Default)]
    struct EchoTransport {
        urls: RefCell<Vec<String>>,
    }

    impl Transport for EchoTransport {
        fn send(
            &self,
            request: &ApiRequest,
        ) -> std::result::Result<ApiResponse<String>, TransportError> {
            self.urls.borrow_mut().push(request.url.clone());
            Ok(ApiResponse {
                data: "{}".to_string(),
                status: StatusCode::OK,
                url: request.url.clone(),
            })
        }
    }

    fn connector() -> Connector<EchoTransport> {
        Connector::with_transport(
            EchoTransport::default(),
            ValidatedUrl::parse("https://api.notion.com/v1").unwrap(),
        )
    }

    #[test]
    fn test_relative_endpoints_are_joined_to_the_base() {
        let connector = connector();
        connector.request(Method::GET, "users/me", None).unwrap();
        connector.request(Method::POST, "/search", Some(json!({}))).unwrap();
        assert_eq!(
            *connector.transport.urls.borrow(),
            vec![
                "https://api.notion.com/v1/users/me".to_string(),
                "https://api.notion.com/v1/search".to_string()
            ]
        );
    }

    #[test]
    fn test_foreign_urls_are_refused() {
        let connector = connector();
        for url in [
            "https://example.com/v1/users",
            "https://api.notion.com.evil.io/v1/users",
            "https://api.notion.com/v10/users",
        ] {
            assert!(matches!(
                connector.request(Method::GET, url, None),
                Err(NotionDbError::InvalidRequest(_))
            ));
        }
        assert!(connector
            .request(Method::GET, "https://api.notion.com/v1/users", None)
            .is_ok());
        assert_eq!(connector.transport.urls.borrow().len(), 1);
    }

    #[test]
    fn test_update_row_needs_a_page_id() {
        let err = connector().update_row(&Row::new()).unwrap_err();
        assert!(matches!(err, NotionDbError::InvalidRequest(_)));
    }
}
