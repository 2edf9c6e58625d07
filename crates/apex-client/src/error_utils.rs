//! Mapping of HTTP failures onto `ApexError`

use apex_core::ApexError;
use reqwest::{Response, StatusCode};
use serde_json::Value;

const MAX_ERROR_TEXT_CHARS: usize = 1_024;

/// Convert a non-success response into a server error
pub async fn handle_http_error(response: Response, operation: &str) -> ApexError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error_from_body(status, &body, operation)
}

/// Build a server error from a status and raw body.
///
/// Bodies shaped like `[{"errorCode": ..., "message": ...}]` or
/// `{"errorCode": ..., "message": ...}` keep their code and message; anything
/// else is reported with the status line.
pub fn error_from_body(status: StatusCode, body: &str, operation: &str) -> ApexError {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let entry = match &parsed {
        Some(Value::Array(items)) => items.first(),
        Some(value @ Value::Object(_)) => Some(value),
        _ => None,
    };

    let code = entry
        .and_then(|e| e.get("errorCode"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let message = entry
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);

    match message {
        Some(message) => ApexError::Server {
            message,
            code,
            actions: actions_for(status),
            context: Some(format!("{} returned {}", operation, status)),
        },
        None => ApexError::Server {
            message: format!("{} failed with {}: {}", operation, status, truncate(body.trim())),
            code: Some(format!("HTTP_{}", status.as_u16())),
            actions: actions_for(status),
            context: None,
        },
    }
}

/// Wrap a transport failure (DNS, TLS, connection reset, timeout)
pub fn transport_error(error: reqwest::Error, operation: &str) -> ApexError {
    ApexError::server_with_context(
        format!("{} request failed: {}", operation, error),
        "Failed to reach the test service",
    )
}

/// Wrap a response body that did not match the expected shape
pub fn parse_error(error: reqwest::Error, operation: &str) -> ApexError {
    ApexError::server_with_context(
        format!("Unexpected {} response: {}", operation, error),
        "Failed to parse test service response",
    )
}

fn actions_for(status: StatusCode) -> Vec<String> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => vec![
            "Refresh the access token for this org and try again.".to_string(),
        ],
        _ => Vec::new(),
    }
}

fn truncate(text: &str) -> String {
    if text.is_empty() {
        return "<empty error response body>".to_string();
    }
    if text.chars().count() <= MAX_ERROR_TEXT_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(MAX_ERROR_TEXT_CHARS).collect();
    format!("{}... [truncated]", truncated)
}
