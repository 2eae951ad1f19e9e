//! Transport error categorization.
//!
//! Maps `reqwest` failures onto the numeric transport codes reported through
//! `TransportFailure`.

use std::io;

use crate::config::{
    TRANSPORT_CODE_BAD_CONTENT_ENCODING, TRANSPORT_CODE_COULDNT_CONNECT,
    TRANSPORT_CODE_OPERATION_TIMEDOUT, TRANSPORT_CODE_RECV_ERROR,
    TRANSPORT_CODE_TOO_MANY_REDIRECTS, TRANSPORT_CODE_URL_MALFORMAT,
};

use super::types::TransportFailure;

/// Categorizes a `reqwest::Error` into a transport code.
///
/// Timeouts are checked first since a timed-out connect is also a connect error.
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
///
/// # Returns
///
/// The transport code for the error.
pub fn categorize_reqwest_error(error: &reqwest::Error) -> u32 {
    if error.is_timeout() {
        TRANSPORT_CODE_OPERATION_TIMEDOUT
    } else if error.is_builder() {
        TRANSPORT_CODE_URL_MALFORMAT
    } else if error.is_redirect() {
        TRANSPORT_CODE_TOO_MANY_REDIRECTS
    } else if error.is_connect() {
        TRANSPORT_CODE_COULDNT_CONNECT
    } else if error.is_decode() {
        TRANSPORT_CODE_BAD_CONTENT_ENCODING
    } else {
        TRANSPORT_CODE_RECV_ERROR
    }
}

/// Converts a `reqwest::Error` into a `TransportFailure`.
pub fn transport_failure_from_reqwest(error: &reqwest::Error) -> TransportFailure {
    TransportFailure::new(categorize_reqwest_error(error), error.to_string())
}

/// Converts an I/O error raised while streaming a body into a `TransportFailure`.
///
/// Timeouts keep the timeout code; everything else gets `fallback` (a receive
/// or write error, depending on which side failed).
pub fn transport_failure_from_io(error: &io::Error, fallback: u32) -> TransportFailure {
    let code = match error.kind() {
        io::ErrorKind::TimedOut => TRANSPORT_CODE_OPERATION_TIMEDOUT,
        _ => fallback,
    };
    TransportFailure::new(code, error.to_string())
}
