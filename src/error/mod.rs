//! Error handling module for scroll operations.
//!
//! This module provides error handling for search and scroll operations with:
//! - A request/response split mirroring where the fault originated
//! - Structured error information extraction from search service error bodies
//! - Consistent JSON error formatting for APIs and logging
//!
//! Remote failures are passed through unmodified: `restart` and `advance`
//! surface them as the same request/response categories the transport
//! reported, with no local retry or wrapping.

pub mod kinds;
pub mod search;

// Re-export commonly used types
pub use kinds::{
    ConfigError, CursorError, EscrollError, RequestError, ResponseError, Result,
};
pub use search::{ErrorCause, ErrorInfo};
