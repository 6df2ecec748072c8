use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Structured API error surfaced to clients as `{status, message, details}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &str, details: Option<String>) -> Self {
        Self { status, message: message.to_string(), details }
    }

    pub fn bad_request(message: &str, details: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "status": self.status.as_u16(),
            "message": self.message,
        });
        if let Some(details) = self.details {
            body["details"] = serde_json::Value::String(details);
        }
        (self.status, Json(body)).into_response()
    }
}
