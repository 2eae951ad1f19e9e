//! Configuration constants.
//!
//! Defaults used by `Config`, the cookie record format and the numeric codes a
//! transport reports when an exchange fails.

use std::time::Duration;

/// Default User-Agent string for outbound requests.
///
/// Can be replaced per crawler through `Config::user_agent` or per request through
/// `Options::set_user_agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:127.0) Gecko/20100101 Firefox/127.0";

/// Default limit of redirect hops followed for a single call.
pub const DEFAULT_REDIRECTS_LIMIT: usize = 10;

/// Default overall timeout for one exchange
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default TCP connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Mode applied to downloaded files when no explicit mode is configured (unix only).
pub const DEFAULT_FILE_MODE: u32 = 0o644;

// Cookie records
/// Marker prepended to the host field of a jar record for HttpOnly cookies.
pub const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";
/// Number of tab-separated fields in a jar record.
pub const COOKIE_RECORD_FIELDS: usize = 7;
/// Age (in seconds) subtracted from "now" when rendering a deleted cookie's expiry.
pub const COOKIE_DELETION_AGE_SECS: i64 = 31_536_001;
/// Header written at the top of cookie files.
pub const COOKIE_FILE_HEADER: &str = "# Netscape HTTP Cookie File";

// Transport error codes
// Numbering follows the libcurl error table so codes stay familiar in logs.
/// URL could not be parsed or the request could not be built
pub const TRANSPORT_CODE_URL_MALFORMAT: u32 = 3;
/// Connection to the remote host failed
pub const TRANSPORT_CODE_COULDNT_CONNECT: u32 = 7;
/// Writing the body to the sink failed
pub const TRANSPORT_CODE_WRITE_ERROR: u32 = 23;
/// The exchange timed out
pub const TRANSPORT_CODE_OPERATION_TIMEDOUT: u32 = 28;
/// The transport gave up following redirects on its own
pub const TRANSPORT_CODE_TOO_MANY_REDIRECTS: u32 = 47;
/// Receiving data failed
pub const TRANSPORT_CODE_RECV_ERROR: u32 = 56;
/// Content decoding failed
pub const TRANSPORT_CODE_BAD_CONTENT_ENCODING: u32 = 61;
