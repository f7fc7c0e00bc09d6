use std::{fmt, io};

use crate::error::search::format_response_error;

/// Crate-wide `Result` type using [`EscrollError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, EscrollError>;

/// Top-level error type for escroll operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum EscrollError {
    /// The request failed before the server processed it.
    Request(RequestError),

    /// The server processed the request and returned an error result.
    Response(ResponseError),

    /// Cursor precondition faults local to this crate.
    Cursor(CursorError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),
}

/// Client-side request errors.
///
/// These correspond to faults raised before the server could act on the
/// request: transport failures, malformed endpoints, payload encoding.
#[derive(Debug)]
pub enum RequestError {
    /// The request never reached the server (connect, DNS, TLS, timeout).
    Transport(String),

    /// The endpoint URL could not be constructed.
    InvalidUrl(String),

    /// A success response body could not be decoded.
    Decode(String),
}

/// Server-side response error.
///
/// The server accepted the request but answered with an error result.
/// Carries the HTTP status and whatever structured information the error
/// body exposed.
#[derive(Debug)]
pub struct ResponseError {
    /// HTTP status code of the error response.
    pub status: u16,

    /// Structured information extracted from the error body.
    pub info: super::search::ErrorInfo,
}

/// Cursor state errors.
#[derive(Debug)]
pub enum CursorError {
    /// `advance` was called before any page was fetched.
    NotStarted,

    /// The most recent page carried no scroll handle to continue from.
    MissingHandle,
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for EscrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscrollError::Request(e) => write!(f, "Request error: {e}"),
            EscrollError::Response(e) => format_response_error(f, e),
            EscrollError::Cursor(e) => write!(f, "Cursor error: {e}"),
            EscrollError::Config(e) => write!(f, "Configuration error: {e}"),
            EscrollError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Transport(msg) => write!(f, "Transport failure: {msg}"),
            RequestError::InvalidUrl(url) => write!(f, "Invalid endpoint URL: {url}"),
            RequestError::Decode(msg) => write!(f, "Failed to decode response: {msg}"),
        }
    }
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_response_error(f, self)
    }
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::NotStarted => {
                write!(f, "No scroll handle available: call restart before advance")
            }
            CursorError::MissingHandle => {
                write!(f, "The last page carried no scroll handle; the scroll cannot continue")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for EscrollError {}
impl std::error::Error for RequestError {}
impl std::error::Error for ResponseError {}
impl std::error::Error for CursorError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to EscrollError ========================= */

impl From<io::Error> for EscrollError {
    fn from(err: io::Error) -> Self {
        EscrollError::Io(err)
    }
}

impl From<RequestError> for EscrollError {
    fn from(err: RequestError) -> Self {
        EscrollError::Request(err)
    }
}

impl From<ResponseError> for EscrollError {
    fn from(err: ResponseError) -> Self {
        EscrollError::Response(err)
    }
}

impl From<CursorError> for EscrollError {
    fn from(err: CursorError) -> Self {
        EscrollError::Cursor(err)
    }
}

impl From<ConfigError> for EscrollError {
    fn from(err: ConfigError) -> Self {
        EscrollError::Config(err)
    }
}

impl From<reqwest::Error> for EscrollError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_builder() {
            RequestError::InvalidUrl(err.to_string())
        } else if err.is_decode() {
            RequestError::Decode(err.to_string())
        } else {
            // connect, DNS, TLS, timeout, body — all faults on the way out
            RequestError::Transport(err.to_string())
        };

        EscrollError::Request(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_error_display() {
        let err = EscrollError::from(CursorError::NotStarted);
        assert!(err.to_string().contains("restart"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            field: "keep_alive".to_string(),
            value: "".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid value '' for field 'keep_alive'");
    }

    #[test]
    fn test_io_error_conversion() {
        let err: EscrollError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, EscrollError::Io(_)));
    }
}
