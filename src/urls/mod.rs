//! URL building blocks.
//!
//! This module provides:
//! - Percent-encoding of unsafe characters in caller-typed URLs
//! - `UrlParts`, a lenient split of a URL into its components and back
//! - Path joining/normalization against a base path
//! - `Query`, an ordered query mapping with layered merging
//! - Completion of relative redirect locations and canonical URL forms

mod encode;
mod parts;
mod path;
mod query;

// Re-export public API
pub use encode::{encode_unsafe, raw_url_encode};
pub use parts::UrlParts;
pub use path::{has_trailing_slash, normalize_path, remove_last_segment};
pub use query::{Query, QueryValue};

/// Completes a possibly-relative `location` against the URL it was received from.
///
/// # Arguments
///
/// * `location` - Redirect target as reported by the transport
/// * `base` - URL of the exchange that produced the redirect
///
/// # Returns
///
/// The absolute URL. When `base` is not an absolute URL, `location` is returned unchanged.
pub fn complete_url(location: &str, base: &str) -> String {
    match url::Url::parse(base).and_then(|base| base.join(location.trim())) {
        Ok(url) => url.to_string(),
        Err(_) => location.trim().to_string(),
    }
}

/// Serializes an absolute URL the way `url::Url` does: lowercase scheme and
/// host, default port dropped, unsafe characters escaped.
///
/// Input that does not parse as an absolute URL is returned trimmed.
pub fn canonical_url(url: &str) -> String {
    match url::Url::parse(url.trim()) {
        Ok(url) => url.to_string(),
        Err(_) => url.trim().to_string(),
    }
}

#[cfg(test)]
mod tests;
