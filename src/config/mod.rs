//! Configuration module.
//!
//! This module provides:
//! - Crawler configuration (`Config`) with defaults
//! - Logging level and format selection
//! - Constants for defaults, cookie records and transport error codes
//! - Header name constants used by the request/response model

mod constants;
mod headers;
mod types;

// Re-export public API
pub use constants::*;
pub use headers::*;
pub use types::{Config, LogFormat, LogLevel};
