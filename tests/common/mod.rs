//! Shared fixtures: an in-memory transport and canned API objects.

#![allow(dead_code)]

use notiondb::{ApiRequest, ApiResponse, Connector, Transport, TransportError, ValidatedUrl};
use reqwest::StatusCode;
use serde_json::{json, Value as Json};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const DATABASE_ID: &str = "bc1211ca-e3f1-4939-ae34-5260b16f627c";
pub const PARENT_PAGE_ID: &str = "98ad959b-2b6a-4774-80ee-00246fb0ea9b";
pub const ROW_ID_1: &str = "59833787-2cf9-4fdf-8782-e53db20768a5";
pub const ROW_ID_2: &str = "2f6ae6ed-7fe0-4c66-8f5b-c7c5d8f4c7d1";

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<(StatusCode, String)>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, body: Json) -> &Self {
        self.respond_with(StatusCode::OK, body.to_string())
    }

    pub fn respond_with(&self, status: StatusCode, body: impl Into<String>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.into()));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse<String>, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let (status, data) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Other("connection refused".to_string()))?;
        Ok(ApiResponse {
            data,
            status,
            url: request.url.clone(),
        })
    }
}

pub fn connector(transport: &MockTransport) -> Connector<&MockTransport> {
    Connector::with_transport(
        transport,
        ValidatedUrl::parse("https://api.notion.com/v1").unwrap(),
    )
}

fn text(content: &str) -> Json {
    json!([{
        "type": "text",
        "text": { "content": content, "link": null },
        "annotations": {
            "bold": false, "italic": false, "strikethrough": false,
            "underline": false, "code": false, "color": "default"
        },
        "plain_text": content,
        "href": null
    }])
}

/// A database with a title, a number, a select and an unsupported column.
pub fn database_json() -> Json {
    json!({
        "object": "database",
        "id": DATABASE_ID,
        "title": text("People"),
        "url": "https://www.notion.so/bc1211cae3f14939ae345260b16f627c",
        "archived": false,
        "properties": {
            "Name": { "id": "title", "name": "Name", "type": "title", "title": {} },
            "Age": { "id": "%3DaGe", "name": "Age", "type": "number", "number": { "format": "number" } },
            "Team": {
                "id": "t%5Ee",
                "name": "Team",
                "type": "select",
                "select": { "options": [
                    { "id": "1", "name": "Core", "color": "blue" },
                    { "id": "2", "name": "Infra", "color": "green" }
                ] }
            },
            "Files": { "id": "f1", "name": "Files", "type": "files", "files": {} }
        }
    })
}

/// A page of the database above.
pub fn page_json(id: &str, name: &str, age: i64) -> Json {
    json!({
        "object": "page",
        "id": id,
        "url": format!("https://www.notion.so/{}", id.replace('-', "")),
        "archived": false,
        "parent": { "type": "database_id", "database_id": DATABASE_ID },
        "properties": {
            "Name": { "id": "title", "type": "title", "title": text(name) },
            "Age": { "id": "%3DaGe", "type": "number", "number": age },
            "Team": { "id": "t%5Ee", "type": "select", "select": { "id": "1", "name": "Core", "color": "blue" } },
            "Files": { "id": "f1", "type": "files", "files": [] }
        }
    })
}

pub fn query_json(pages: Vec<Json>, next_cursor: Option<&str>) -> Json {
    json!({
        "object": "list",
        "results": pages,
        "next_cursor": next_cursor,
        "has_more": next_cursor.is_some()
    })
}
