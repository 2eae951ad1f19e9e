//! Resource setup.
//!
//! This module provides:
//! - Logger installation for applications embedding the crate
//! - Blocking HTTP client builders used by `ReqwestTransport`
//!
//! All initialization functions return `InitializationError` on failure.

mod client;
mod logger;

// Re-export public API
pub use client::{init_client, init_redirect_client};
pub use logger::{init_logger, init_logger_with};
