//! HTTP model types.
//!
//! This module provides:
//! - `Method`, the request verb (standard set plus custom tokens)
//! - `Headers`, an ordered case-insensitive multi-map
//! - The static status code → reason phrase table

mod headers;
mod method;
mod status;

// Re-export public API
pub use headers::Headers;
pub use method::Method;
pub use status::{is_edge_proxy_error_code, is_redirect_code, reason_phrase_for_code};
