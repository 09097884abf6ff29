//! Normalized gateway error.

use polidraft_core::PolidraftError;
use serde_json::Value;
use thiserror::Error;

/// Single error type for every gateway call.
///
/// `status` is the HTTP status of a rejected response, or `0` when the
/// request never produced one (connection failure or timeout). `payload`
/// carries the decoded error body when the server returned JSON.
#[derive(Debug, Clone, Error)]
#[error("API error ({status}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    pub payload: Option<Value>,
}

impl ApiError {
    /// Builds the error for a non-success response body.
    ///
    /// The message comes from the JSON `detail` field when present, then
    /// the raw text body, then a generic `HTTP {status}` marker.
    pub fn from_response(status: u16, body: &str) -> Self {
        let payload: Option<Value> = serde_json::from_str(body).ok();
        let message = payload
            .as_ref()
            .and_then(|v| v.get("detail"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                }
            });
        Self {
            status,
            message,
            payload,
        }
    }

    /// Builds the status-0 error for a request that never got a response.
    pub fn transport(err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        Self {
            status: 0,
            message,
            payload: None,
        }
    }

    /// Builds the error for a success response whose body failed to decode.
    pub fn decode(err: &reqwest::Error) -> Self {
        Self {
            status: 0,
            message: format!("failed to decode response: {}", err),
            payload: None,
        }
    }

    /// True when the request never reached the server.
    pub fn is_transport(&self) -> bool {
        self.status == 0
    }
}

impl From<ApiError> for PolidraftError {
    fn from(err: ApiError) -> Self {
        PolidraftError::api(err.status, err.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_field_becomes_the_message() {
        let err = ApiError::from_response(422, r#"{"detail":"invalid session"}"#);
        assert_eq!(err.status, 422);
        assert_eq!(err.message, "invalid session");
        assert!(err.payload.is_some());
    }

    #[test]
    fn test_text_body_is_used_verbatim() {
        let err = ApiError::from_response(502, "bad gateway");
        assert_eq!(err.message, "bad gateway");
        assert!(err.payload.is_none());
    }

    #[test]
    fn test_empty_body_falls_back_to_status_marker() {
        let err = ApiError::from_response(500, "");
        assert_eq!(err.message, "HTTP 500");
    }

    #[test]
    fn test_json_without_detail_keeps_the_raw_body() {
        let err = ApiError::from_response(500, r#"{"error":"boom"}"#);
        assert_eq!(err.message, r#"{"error":"boom"}"#);
        assert!(err.payload.is_some());
    }
}
