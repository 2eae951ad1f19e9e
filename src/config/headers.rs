//! HTTP header name constants.
//!
//! Names are stored lowercase since `Headers` keys are case-insensitive.

/// Content-Type header
pub const HEADER_CONTENT_TYPE: &str = "content-type";
/// Content-Length header
pub const HEADER_CONTENT_LENGTH: &str = "content-length";
/// Location header (redirect target)
pub const HEADER_LOCATION: &str = "location";
/// Set-Cookie header
pub const HEADER_SET_COOKIE: &str = "set-cookie";
/// Cookie header
pub const HEADER_COOKIE: &str = "cookie";
/// Authorization header
pub const HEADER_AUTHORIZATION: &str = "authorization";
/// Last-Modified header (remote document time)
pub const HEADER_LAST_MODIFIED: &str = "last-modified";
/// X-Requested-With header
pub const HEADER_X_REQUESTED_WITH: &str = "x-requested-with";
/// Value of `X-Requested-With` sent by AJAX clients
pub const XHR_VALUE: &str = "XMLHttpRequest";

// Content types for request payloads
/// Plain text payload
pub const CONTENT_TYPE_PLAIN: &str = "text/plain";
/// Multipart form payload
pub const CONTENT_TYPE_MULTIPART: &str = "multipart/form-data";
/// JSON payload
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// URL-encoded form payload
pub const CONTENT_TYPE_URLENCODED: &str = "application/x-www-form-urlencoded";
