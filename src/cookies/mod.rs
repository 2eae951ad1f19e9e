//! Cookie model and jar.
//!
//! This module provides:
//! - `Cookie`, a single cookie with its portable 7-field jar record
//! - `CookieJar`, the durable Netscape-style store a transport owns
//!
//! The jar record format is tab separated:
//!
//! ```text
//! [#HttpOnly_]host  TRUE|FALSE  path  TRUE|FALSE  expires  name  value
//! ```
//!
//! where the second field is "include subdomains", the fourth is "secure" and
//! `expires` is a unix timestamp (0 for session cookies).

mod cookie;
mod jar;

// Re-export public API
pub use cookie::Cookie;
pub use jar::CookieJar;
