/// Centralized helpers for WebSocket and HTTP error responses.
///
/// Every error sent to a client carries a code, a message and an optional context.
use actix_web::{HttpResponse, http::StatusCode};
use serde_json::json;

use crate::server::game_session::messages::ServerMessage;

/// Formats a WebSocket error message as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_ACTION").
/// - `message`: Human-readable error message.
/// - `context`: Optional context (e.g. the offending value).
pub fn ws_error_message(code: &str, message: &str, context: Option<&str>) -> String {
    let msg = ServerMessage::error(code, message, context);
    serde_json::to_string(&msg).unwrap_or_else(|_| {
        r#"{"action":"Error","data":{"code":"INTERNAL","message":"Internal server error"}}"#.to_string()
    })
}

/// Returns an HTTP error response with a JSON body.
pub fn http_error_response(
    code: &str,
    message: &str,
    context: Option<&str>,
    status: StatusCode,
) -> HttpResponse {
    let body = json!({
        "error": {
            "code": code,
            "message": message,
            "context": context.unwrap_or(""),
        }
    });
    HttpResponse::build(status).json(body)
}
