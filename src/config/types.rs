//! Configuration types.
//!
//! This module defines the crawler configuration struct and the logging
//! enums applications pass to `initialization::init_logger_with`.

use std::time::Duration;

use crate::config::constants::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_REDIRECTS_LIMIT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Crawler configuration.
///
/// Seeds the policy fields of a `Context` and the transport connector. Everything
/// here can still be changed later through the `Context` setters.
///
/// # Examples
///
/// ```no_run
/// use crawlkit::{Config, Context};
///
/// let config = Config {
///     redirects_limit: Some(3),
///     strict_path_handling: true,
///     ..Default::default()
/// };
///
/// let context = Context::from_config(config, "example.org", None);
/// assert_eq!(context.redirects_limit(), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Overall timeout for one exchange
    pub timeout: Duration,

    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Verify TLS certificates of remote hosts
    pub verify_tls: bool,

    /// Use `https` as the default scheme
    pub secured: bool,

    /// Follow redirects through the redirect state machine
    pub redirects_allowed: bool,

    /// Maximum number of redirect hops (`None` = unlimited)
    pub redirects_limit: Option<usize>,

    /// Reuse the transport handle across calls
    pub persist_transport: bool,

    /// Treat the default path as a directory when resolving relative paths
    pub strict_path_handling: bool,

    /// Percent-encode unsafe characters before parsing caller URLs
    pub encode_urls: bool,

    /// Run response bodies through the registered pipelines
    pub pipelines_active: bool,

    /// Capture a verbose trace of each exchange
    pub verbose: bool,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            verify_tls: true,
            secured: true,
            redirects_allowed: true,
            redirects_limit: Some(DEFAULT_REDIRECTS_LIMIT),
            persist_transport: true,
            strict_path_handling: false,
            encode_urls: true,
            pipelines_active: true,
            verbose: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
