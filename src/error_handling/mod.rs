//! Error handling.
//!
//! This module provides:
//! - Error type definitions (`CrawlerError` and the per-concern errors it wraps)
//! - `ErrorKind` categories with stable labels
//! - Categorization of `reqwest` failures into numeric transport codes
//!
//! Failures are split into:
//! - **Transport-level**: no HTTP response was obtained (init, exchange, timeout)
//! - **Redirect**: a chain looped or exceeded its limit
//! - **Local**: cookie records, pipes, extraction and file I/O

mod categorization;
mod types;

// Re-export public API
pub use categorization::{
    categorize_reqwest_error, transport_failure_from_io, transport_failure_from_reqwest,
};
pub use types::{
    CookieError, CrawlerError, ErrorKind, ExtractorError, InitializationError, PipeError,
    RedirectFailure, TransportFailure,
};
