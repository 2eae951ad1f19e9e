//! Error type definitions.
//!
//! This module defines all error types used throughout the crate.

use std::fmt;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::TRANSPORT_CODE_OPERATION_TIMEDOUT;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// A jar record could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CookieError {
    /// The record does not split into exactly 7 tab-separated fields.
    #[error("Malformed cookie record: expected 7 fields, found {fields}")]
    MalformedRecord {
        /// Number of fields actually found
        fields: usize,
    },
}

/// A pipe signalled a hard failure instead of degrading to "no value".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Pipe failed: {0}")]
pub struct PipeError(pub String);

/// Content extraction did not match.
///
/// Carries the failing pattern together with the URL and content it was
/// applied to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} (pattern `{pattern}` on {})", .url.as_deref().unwrap_or("<no url>"))]
pub struct ExtractorError {
    /// What went wrong
    pub message: String,
    /// The regular expression that failed
    pub pattern: String,
    /// URL of the extracted document
    pub url: Option<String>,
    /// The content the pattern ran against
    pub content: Option<String>,
}

impl ExtractorError {
    /// Maximum number of characters returned by `snippet`.
    pub const SNIPPET_LENGTH: usize = 200;

    /// The beginning of the content, for logs.
    pub fn snippet(&self) -> Option<String> {
        self.content
            .as_deref()
            .map(|c| c.chars().take(Self::SNIPPET_LENGTH).collect())
    }
}

/// A transport exchange failed before an HTTP response was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Transport error {code}: {message}")]
pub struct TransportFailure {
    /// Numeric error code (libcurl numbering, 28 = timeout)
    pub code: u32,
    /// Human-readable description
    pub message: String,
}

impl TransportFailure {
    /// Creates a failure with a code and message.
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns `true` for the timeout code.
    pub fn is_timeout(&self) -> bool {
        self.code == TRANSPORT_CODE_OPERATION_TIMEDOUT
    }
}

/// Details of a redirect chain that was aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectFailure {
    /// URLs fetched in this chain, in order
    pub chain: Vec<String>,
    /// The location that caused the failure
    pub location: String,
    /// Status code of the last redirect response
    pub status_code: u16,
    /// 1-based hop count at the failure
    pub count: usize,
}

impl fmt::Display for RedirectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hop {} ({}) to {} after {}",
            self.count,
            self.status_code,
            self.location,
            self.chain.join(" -> ")
        )
    }
}

/// Errors returned by `Context` operations.
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// The transport handle could not be created.
    #[error("Transport initialization error: {0}")]
    TransportInit(String),

    /// A transport exchange failed mid-call.
    #[error("Transport error {code} for {url}: {message}")]
    Transport {
        /// URL of the failed exchange
        url: String,
        /// Numeric error code
        code: u32,
        /// Human-readable description
        message: String,
    },

    /// A transport exchange timed out.
    #[error("Request to {url} timed out: {message}")]
    Timeout {
        /// URL of the failed exchange
        url: String,
        /// Human-readable description
        message: String,
    },

    /// A redirect location reappeared in the current chain.
    #[error("Looped redirect: {0}")]
    LoopedRedirect(RedirectFailure),

    /// The redirect hop count exceeded the configured limit.
    #[error("Redirect limit overflowed: {0}")]
    RedirectOverflow(RedirectFailure),

    /// A cookie record was malformed.
    #[error(transparent)]
    Cookie(#[from] CookieError),

    /// A pipe failed hard.
    #[error(transparent)]
    Pipeline(#[from] PipeError),

    /// Content extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractorError),

    /// File I/O failed (cookie files, download sinks).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A download destination could not be derived.
    #[error("Cannot derive a download destination from {0}")]
    InvalidDestination(String),
}

impl CrawlerError {
    /// Builds the error for a failed exchange, separating timeouts.
    pub fn from_transport(url: &str, failure: TransportFailure) -> Self {
        if failure.is_timeout() {
            CrawlerError::Timeout {
                url: url.to_string(),
                message: failure.message,
            }
        } else {
            CrawlerError::Transport {
                url: url.to_string(),
                code: failure.code,
                message: failure.message,
            }
        }
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrawlerError::TransportInit(_) => ErrorKind::TransportInit,
            CrawlerError::Transport { .. } => ErrorKind::Transport,
            CrawlerError::Timeout { .. } => ErrorKind::Timeout,
            CrawlerError::LoopedRedirect(_) => ErrorKind::LoopedRedirect,
            CrawlerError::RedirectOverflow(_) => ErrorKind::RedirectOverflow,
            CrawlerError::Cookie(_) => ErrorKind::MalformedCookie,
            CrawlerError::Pipeline(_) => ErrorKind::Pipeline,
            CrawlerError::Extraction(_) => ErrorKind::Extraction,
            CrawlerError::Io(_) => ErrorKind::Io,
            CrawlerError::InvalidDestination(_) => ErrorKind::InvalidDestination,
        }
    }

    /// Returns `true` when no HTTP response was obtained.
    pub fn is_transport_level(&self) -> bool {
        matches!(
            self,
            CrawlerError::TransportInit(_)
                | CrawlerError::Transport { .. }
                | CrawlerError::Timeout { .. }
        )
    }

    /// The aborted redirect chain, for redirect errors.
    pub fn redirect_failure(&self) -> Option<&RedirectFailure> {
        match self {
            CrawlerError::LoopedRedirect(failure) | CrawlerError::RedirectOverflow(failure) => {
                Some(failure)
            }
            _ => None,
        }
    }
}

/// Categories of `CrawlerError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    /// The transport could not be built
    TransportInit,
    /// The exchange failed below HTTP
    Transport,
    /// The exchange ran out of time
    Timeout,
    /// A redirect pointed back into the chain
    LoopedRedirect,
    /// More redirects than the limit allows
    RedirectOverflow,
    /// A cookie record could not be parsed
    MalformedCookie,
    /// A pipe failed hard
    Pipeline,
    /// A pattern did not compile or match
    Extraction,
    /// Local file I/O
    Io,
    /// No download file name could be derived
    InvalidDestination,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    /// Returns a human-readable label for the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::TransportInit => "Transport initialization error",
            ErrorKind::Transport => "Transport error",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::LoopedRedirect => "Looped redirect",
            ErrorKind::RedirectOverflow => "Redirect limit overflow",
            ErrorKind::MalformedCookie => "Malformed cookie record",
            ErrorKind::Pipeline => "Pipeline failure",
            ErrorKind::Extraction => "Extraction mismatch",
            ErrorKind::Io => "I/O error",
            ErrorKind::InvalidDestination => "Invalid download destination",
        }
    }
}
