//! The transport contract.
//!
//! A `Transport` performs one network exchange from a prepared `Exchange`
//! descriptor and reports a `Reply`: status, raw header lines, body or sink
//! output, redirect target and timings. It also owns the durable cookie jar.
//! The `Context` drives redirects, cookies and pipelines on top of it.

mod http_client;

use std::fs::File;
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::error_handling::{CrawlerError, TransportFailure};
use crate::http::Method;

use super::Options;

// Re-export public API
pub use http_client::ReqwestTransport;

/// A body destination that can be reset between redirect hops.
pub trait BodySink: Write + Send {
    /// Discards everything written so far.
    fn truncate(&mut self) -> io::Result<()>;
}

impl BodySink for File {
    fn truncate(&mut self) -> io::Result<()> {
        self.set_len(0)?;
        self.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

impl BodySink for Vec<u8> {
    fn truncate(&mut self) -> io::Result<()> {
        self.clear();
        Ok(())
    }
}

/// Request descriptor for one exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Absolute URL to fetch
    pub url: String,
    /// Request method; `options.custom_method` takes precedence on the wire
    pub method: Method,
    /// Header lines as `Name: value`
    pub header_lines: Vec<String>,
    /// Option bag (payload, proxy, timeouts, follow-redirects, ...)
    pub options: Options,
    /// Capture a verbose trace
    pub verbose: bool,
}

impl Exchange {
    /// The method token sent on the wire.
    pub fn wire_method(&self) -> &Method {
        self.options.custom_method.as_ref().unwrap_or(&self.method)
    }
}

/// Timing breakdown of one exchange, all in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timings {
    /// DNS resolution
    pub name_lookup: f64,
    /// TCP (and proxy) connect
    pub connect: f64,
    /// Until the request was ready to be sent
    pub pre_transfer: f64,
    /// Until the first response byte
    pub start_transfer: f64,
    /// Spent following redirects inside the transport
    pub redirect: f64,
    /// Whole exchange
    pub total: f64,
}

impl Timings {
    /// Pure body-transfer time: the total minus every other component, clamped at zero.
    pub fn transfer_seconds(&self) -> f64 {
        let transfer = self.total
            - self.name_lookup
            - self.connect
            - self.pre_transfer
            - self.start_transfer
            - self.redirect;
        transfer.max(0.0)
    }

    /// Builds timings from measured durations of the header and full phases.
    pub fn measured(start_transfer: Duration, total: Duration) -> Self {
        Self {
            start_transfer: start_transfer.as_secs_f64(),
            total: total.as_secs_f64(),
            ..Default::default()
        }
    }
}

/// Response descriptor for one exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    /// Final URL of the exchange
    pub effective_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Raw header lines; `HTTP/` status lines start a new header block
    pub header_lines: Vec<String>,
    /// Body bytes, or `None` when written to a sink or not fetched
    pub body: Option<Vec<u8>>,
    /// Absolute redirect target reported by the server
    pub redirect_url: Option<String>,
    /// Timing breakdown
    pub timings: Timings,
    /// Bytes downloaded
    pub download_size: i64,
    /// Average download speed in bytes per second
    pub download_speed: i64,
    /// Remote modification time in unix seconds, `-1` when unknown
    pub file_time: i64,
    /// Verbose trace, when requested
    pub verbose: Option<String>,
}

/// A network transport with an owned cookie jar.
pub trait Transport: Send {
    /// Performs one exchange.
    ///
    /// When `sink` is given the body is written into it instead of being
    /// returned in `Reply::body`.
    ///
    /// # Errors
    ///
    /// Returns a `TransportFailure` when no HTTP response was obtained.
    fn exchange(
        &mut self,
        exchange: &Exchange,
        sink: Option<&mut dyn BodySink>,
    ) -> Result<Reply, TransportFailure>;

    /// Imports one jar record. Malformed records are ignored.
    fn import_cookie(&mut self, record: &str);

    /// Jar records of every live cookie.
    fn cookie_records(&self) -> Vec<String>;

    /// Empties the jar.
    fn clear_cookies(&mut self);

    /// Reads a Netscape cookie file into the jar, returning the number of records imported.
    fn load_cookies(&mut self, path: &Path) -> io::Result<usize>;

    /// Writes the jar to a Netscape cookie file.
    fn save_cookies(&self, path: &Path) -> io::Result<()>;
}

/// Builds a fresh transport handle from the context configuration.
pub type Connector = Box<dyn Fn(&Config) -> Result<Box<dyn Transport>, CrawlerError> + Send>;

/// The default connector, producing a `ReqwestTransport`.
pub fn reqwest_connector() -> Connector {
    Box::new(|config: &Config| {
        let transport = ReqwestTransport::new(config)
            .map_err(|e| CrawlerError::TransportInit(e.to_string()))?;
        Ok(Box::new(transport) as Box<dyn Transport>)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_seconds_subtracts_components() {
        let timings = Timings {
            name_lookup: 0.1,
            connect: 0.2,
            pre_transfer: 0.1,
            start_transfer: 0.3,
            redirect: 0.0,
            total: 1.0,
        };
        assert!((timings.transfer_seconds() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_transfer_seconds_clamps_at_zero() {
        let timings = Timings {
            start_transfer: 2.0,
            total: 1.0,
            ..Default::default()
        };
        assert_eq!(timings.transfer_seconds(), 0.0);
    }

    #[test]
    fn test_vec_sink_truncates() {
        let mut sink: Vec<u8> = b"redirect body".to_vec();
        BodySink::truncate(&mut sink).expect("vec truncate");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_file_sink_truncates_and_rewinds() {
        use std::io::Read;

        let mut file = tempfile::tempfile().expect("temp file");
        file.write_all(b"first hop").expect("write");
        BodySink::truncate(&mut file).expect("truncate");
        file.write_all(b"ok").expect("write");
        file.seek(SeekFrom::Start(0)).expect("seek");
        let mut content = String::new();
        file.read_to_string(&mut content).expect("read");
        assert_eq!(content, "ok");
    }

    #[test]
    fn test_wire_method_prefers_custom() {
        let mut exchange = Exchange {
            url: "https://example.org/".to_string(),
            method: Method::Get,
            header_lines: Vec::new(),
            options: Options::default(),
            verbose: false,
        };
        assert_eq!(exchange.wire_method(), &Method::Get);
        exchange.options.custom_method = Some(Method::Post);
        assert_eq!(exchange.wire_method(), &Method::Post);
    }
}
