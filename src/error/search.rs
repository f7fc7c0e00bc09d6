use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::kinds::ResponseError;

/// Structured error information extracted from a search service error body.
///
/// This is intended to be serialized to JSON and consumed by other
/// components (e.g. logging, APIs).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reason: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) root_cause: Vec<ErrorCause>,
}

/// One entry of the error body's `root_cause` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorCause {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) index: Option<String>,
}

impl ErrorInfo {
    /// Convert error info to pretty-printed JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert error info to compact JSON string (single line).
    pub fn to_json_compact(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ResponseError {
    /// Build a response error from an HTTP status and the raw error body.
    pub fn new(status: u16, body: &Value) -> Self {
        Self {
            status,
            info: extract_error_info(status, body),
        }
    }

    /// Whether the server answered "not found" for the addressed resource.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Format a response error as pretty JSON wrapped in an `error` field.
///
/// Intended to be used by the parent module's `Display` implementation for
/// `EscrollError::Response`.
pub fn format_response_error(f: &mut fmt::Formatter<'_>, error: &ResponseError) -> fmt::Result {
    let wrapper = serde_json::json!({ "error": error.info });

    let json_output = serde_json::to_string_pretty(&wrapper).map_err(|_| fmt::Error)?;
    write!(f, "\n{json_output}")
}

/// Extract structured information from a search service error body.
///
/// The standard shape is `{"error": {"type", "reason", "root_cause": [...]},
/// "status": N}`, but older servers and proxies sometimes answer with
/// `{"error": "plain text"}` or non-JSON bodies; those degrade to a bare
/// message.
pub fn extract_error_info(status: u16, body: &Value) -> ErrorInfo {
    let mut info = ErrorInfo {
        status: Some(status),
        name: status_name(status),
        ..ErrorInfo::default()
    };

    match body.get("error") {
        Some(Value::Object(error)) => {
            info.error_type = error
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string);
            info.reason = error
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string);

            if let Some(Value::Array(causes)) = error.get("root_cause") {
                info.root_cause = causes
                    .iter()
                    .filter_map(|cause| serde_json::from_value(cause.clone()).ok())
                    .collect();
            }
        }
        Some(Value::String(message)) => {
            info.reason = Some(message.clone());
        }
        _ => {
            // Unrecognized body shape: keep whatever text it carried.
            if !body.is_null() {
                info.reason = Some(body.to_string());
            }
        }
    }

    info
}

/// Get a human-readable name from an HTTP status code.
fn status_name(status: u16) -> Option<String> {
    let name = match status {
        400 => "BadRequest",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "NotFound",
        408 => "RequestTimeout",
        409 => "Conflict",
        429 => "TooManyRequests",
        500 => "InternalServerError",
        503 => "ServiceUnavailable",
        _ => return None,
    };

    Some(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_structured_error() {
        let body = json!({
            "error": {
                "type": "search_phase_execution_exception",
                "reason": "all shards failed",
                "root_cause": [
                    { "type": "query_shard_exception", "reason": "bad field", "index": "tweets" }
                ]
            },
            "status": 400
        });

        let info = extract_error_info(400, &body);
        assert_eq!(
            info.error_type.as_deref(),
            Some("search_phase_execution_exception")
        );
        assert_eq!(info.reason.as_deref(), Some("all shards failed"));
        assert_eq!(info.name.as_deref(), Some("BadRequest"));
        assert_eq!(info.root_cause.len(), 1);
        assert_eq!(info.root_cause[0].index.as_deref(), Some("tweets"));
    }

    #[test]
    fn test_extract_plain_string_error() {
        let body = json!({ "error": "IndexMissingException[[tweets] missing]" });

        let info = extract_error_info(404, &body);
        assert_eq!(
            info.reason.as_deref(),
            Some("IndexMissingException[[tweets] missing]")
        );
        assert_eq!(info.name.as_deref(), Some("NotFound"));
        assert!(info.root_cause.is_empty());
    }

    #[test]
    fn test_extract_unrecognized_body() {
        let info = extract_error_info(502, &json!("bad gateway"));
        assert_eq!(info.status, Some(502));
        assert!(info.name.is_none());
        assert_eq!(info.reason.as_deref(), Some("\"bad gateway\""));
    }

    #[test]
    fn test_not_found_predicate() {
        let err = ResponseError::new(404, &Value::Null);
        assert!(err.is_not_found());
        assert!(!ResponseError::new(400, &Value::Null).is_not_found());
    }

    #[test]
    fn test_info_serializes_without_empty_fields() {
        let info = extract_error_info(429, &Value::Null);
        let compact = info.to_json_compact().unwrap();
        assert!(!compact.contains("root_cause"));
        assert!(compact.contains("TooManyRequests"));
    }
}
