// src/api/parser.rs
//! Turns raw responses into JSON values or typed errors.

use super::transport::ApiResponse;
use crate::constants::RESPONSE_PREVIEW_LEN;
use crate::error::{NotionDbError, NotionErrorCode, Result};
use serde::Deserialize;
use serde_json::Value as Json;

/// Error body returned by the Notion API.
#[derive(Debug, Clone, Deserialize)]
struct NotionErrorBody {
    code: String,
    message: String,
    #[serde(default)]
    request_id: Option<String>,
}

/// Parses a response: JSON on success, `NotionService` on an error status.
pub fn parse_api_response(result: ApiResponse<String>) -> Result<Json> {
    if result.status.is_success() {
        parse_body(&result.data, &result.url)
    } else {
        Err(parse_error(&result))
    }
}

fn parse_body(body: &str, url: &str) -> Result<Json> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        NotionDbError::MalformedResponse(format!("{} in body: {}", e, preview(body)))
    })
}

fn parse_error(result: &ApiResponse<String>) -> NotionDbError {
    if let Ok(error) = serde_json::from_str::<NotionErrorBody>(&result.data) {
        log::debug!(
            "Notion API error {} ({}) from {}, request id {}",
            error.code,
            result.status,
            result.url,
            error.request_id.as_deref().unwrap_or("unknown")
        );
        return NotionDbError::NotionService {
            code: NotionErrorCode::from_api_response(&error.code),
            message: error.message,
            status: result.status,
        };
    }

    // Fallback to generic error with HTTP status code
    NotionDbError::NotionService {
        code: NotionErrorCode::from_http_status(result.status.as_u16()),
        message: format!("HTTP {} from {}", result.status, result.url),
        status: result.status,
    }
}

fn preview(body: &str) -> String {
    if body.chars().count() > RESPONSE_PREVIEW_LEN {
        let cut: String = body.chars().take(RESPONSE_PREVIEW_LEN).collect();
        format!("{}...", cut)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn response(status: StatusCode, body: &str) -> ApiResponse<String> {
        ApiResponse {
            data: body.to_string(),
            status,
            url: "https://api.notion.com/v1/databases/x".to_string(),
        }
    }

    #[test]
    fn test_success_body_is_json() {
        let json = parse_api_response(response(StatusCode::OK, r#"{"object":"list"}"#)).unwrap();
        assert_eq!(json["object"], "list");
    }

    #[test]
    fn test_api_error_body_is_typed() {
        let body = r#"{"object":"error","status":404,"code":"object_not_found","message":"Could not find database","request_id":"r1"}"#;
        match parse_api_response(response(StatusCode::NOT_FOUND, body)) {
            Err(NotionDbError::NotionService { code, message, status }) => {
                assert_eq!(code, NotionErrorCode::ObjectNotFound);
                assert_eq!(message, "Could not find database");
                assert_eq!(status, StatusCode::NOT_FOUND);
            }
            other => panic!("expected NotionService, got {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_error_falls_back_to_status() {
        match parse_api_response(response(StatusCode::BAD_GATEWAY, "<html>oops</html>")) {
            Err(NotionDbError::NotionService { code, .. }) => {
                assert_eq!(code, NotionErrorCode::HttpStatus(502));
                assert!(code.is_retryable());
            }
            other => panic!("expected NotionService, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_success_body() {
        let body = "x".repeat(RESPONSE_PREVIEW_LEN + 10);
        match parse_api_response(response(StatusCode::OK, &body)) {
            Err(NotionDbError::MalformedResponse(message)) => assert!(message.ends_with("...")),
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }
}
