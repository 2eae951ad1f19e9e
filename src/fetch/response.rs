//! Response assembly.
//!
//! A `Response` is built once per exchange from the transport `Reply`.
//! Header lines are parsed in order; a line starting with `HTTP/` is a status
//! line and discards the headers collected so far, so only the last hop's
//! headers survive when the transport followed redirects itself.

use chrono::{DateTime, Utc};

use crate::http::{is_edge_proxy_error_code, is_redirect_code, reason_phrase_for_code, Headers};

use super::Reply;

/// The outcome of one exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    url: Option<String>,
    status_code: u16,
    reason_phrase: Option<String>,
    plain_headers: Vec<String>,
    headers: Headers,
    content: Option<String>,
    redirect_url: Option<String>,
    download_size: Option<u64>,
    download_speed: Option<u64>,
    download_time: Option<f64>,
    document_time: Option<DateTime<Utc>>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(None, 200, None, None)
    }
}

impl Response {
    /// Creates a response with no headers.
    pub fn new(
        url: Option<&str>,
        status_code: u16,
        content: Option<&str>,
        reason_phrase: Option<&str>,
    ) -> Self {
        let mut headers = Headers::new();
        headers.set_auto_correct_names(false);
        Self {
            url: url.map(str::to_string),
            status_code,
            reason_phrase: reason_phrase.map(str::to_string),
            plain_headers: Vec::new(),
            headers,
            content: content.map(str::to_string),
            redirect_url: None,
            download_size: None,
            download_speed: None,
            download_time: None,
            document_time: None,
        }
    }

    /// Assembles a response from a transport reply.
    ///
    /// The status code and reason phrase of the last status line win over the
    /// reply's status code. Negative sizes and speeds are clamped to zero, and
    /// the document time is only set for a non-negative file time.
    pub fn from_reply(reply: Reply) -> Self {
        let mut status_code = reply.status_code;
        let mut reason_phrase = None;
        let mut plain_headers = Vec::new();
        for line in reply.header_lines {
            let line = line.trim_end_matches(['\r', '\n']);
            if line.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("HTTP/")) {
                plain_headers.clear();
                let mut parts = line.splitn(3, ' ');
                parts.next();
                if let Some(code) = parts.next().and_then(|c| c.trim().parse().ok()) {
                    status_code = code;
                }
                reason_phrase = parts
                    .next()
                    .map(str::trim)
                    .filter(|phrase| !phrase.is_empty())
                    .map(str::to_string);
            } else if !line.trim().is_empty() {
                plain_headers.push(line.to_string());
            }
        }

        let content = reply
            .body
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned());

        let mut response = Response::new(
            Some(&reply.effective_url),
            status_code,
            content.as_deref(),
            reason_phrase.as_deref(),
        );
        response.set_plain_headers(plain_headers);
        response.redirect_url = reply.redirect_url.filter(|url| !url.is_empty());
        response.set_download_size(Some(reply.download_size));
        response.set_download_speed(Some(reply.download_speed));
        response.set_download_time(Some(reply.timings.transfer_seconds()));
        if reply.file_time >= 0 {
            response.document_time = DateTime::<Utc>::from_timestamp(reply.file_time, 0);
        }
        response
    }

    /// Effective URL of the exchange.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Sets the effective URL.
    pub fn set_url(&mut self, url: Option<&str>) {
        self.url = url.map(str::to_string);
    }

    /// HTTP status code.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Sets the status code.
    pub fn set_status_code(&mut self, status_code: u16) {
        self.status_code = status_code;
    }

    /// The reason phrase, falling back to the static table.
    pub fn reason_phrase(&self) -> Option<&str> {
        self.reason_phrase
            .as_deref()
            .or_else(|| reason_phrase_for_code(self.status_code))
    }

    /// Sets the reason phrase.
    pub fn set_reason_phrase(&mut self, reason_phrase: Option<&str>) {
        self.reason_phrase = reason_phrase.map(str::to_string);
    }

    /// Raw header lines of the last hop.
    pub fn plain_headers(&self) -> &[String] {
        &self.plain_headers
    }

    /// Replaces the raw header lines and re-parses them.
    pub fn set_plain_headers(&mut self, plain_headers: Vec<String>) {
        self.headers.clear();
        for line in &plain_headers {
            self.headers.add_line(line);
        }
        self.plain_headers = plain_headers;
    }

    /// Appends one raw header line.
    pub fn add_plain_header(&mut self, line: &str) {
        self.headers.add_line(line);
        self.plain_headers.push(line.to_string());
    }

    /// Drops all headers.
    pub fn clear_headers(&mut self) {
        self.headers.clear();
        self.plain_headers.clear();
    }

    /// Parsed headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Body text; `None` when no body was captured.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Sets the body text.
    pub fn set_content(&mut self, content: Option<&str>) {
        self.content = content.map(str::to_string);
    }

    /// Returns `true` for a missing or empty body.
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().map_or(true, str::is_empty)
    }

    /// Absolute redirect target reported for this exchange.
    pub fn redirect_url(&self) -> Option<&str> {
        self.redirect_url.as_deref()
    }

    /// Sets the redirect target.
    pub fn set_redirect_url(&mut self, redirect_url: Option<&str>) {
        self.redirect_url = redirect_url.map(str::to_string);
    }

    /// Bytes downloaded.
    pub fn download_size(&self) -> Option<u64> {
        self.download_size
    }

    /// Sets the download size, clamping negatives to zero.
    pub fn set_download_size(&mut self, size: Option<i64>) {
        self.download_size = size.map(|s| s.max(0) as u64);
    }

    /// Average download speed in bytes per second.
    pub fn download_speed(&self) -> Option<u64> {
        self.download_speed
    }

    /// Sets the download speed, clamping negatives to zero.
    pub fn set_download_speed(&mut self, speed: Option<i64>) {
        self.download_speed = speed.map(|s| s.max(0) as u64);
    }

    /// Pure body-transfer time in seconds.
    pub fn download_time(&self) -> Option<f64> {
        self.download_time
    }

    /// Sets the transfer time, clamping negatives to zero.
    pub fn set_download_time(&mut self, seconds: Option<f64>) {
        self.download_time = seconds.map(|s| s.max(0.0));
    }

    /// Remote modification time of the document.
    pub fn document_time(&self) -> Option<DateTime<Utc>> {
        self.document_time
    }

    /// Sets the document time.
    pub fn set_document_time(&mut self, document_time: Option<DateTime<Utc>>) {
        self.document_time = document_time;
    }

    /// The first `Content-Length`, when numeric.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .first("content-length")
            .and_then(|v| v.trim().parse().ok())
    }

    /// Returns `true` for the redirect codes the context follows.
    pub fn is_redirect(&self) -> bool {
        is_redirect_code(self.status_code)
    }

    /// Returns `true` for the 520-527 edge-proxy error band.
    pub fn is_edge_proxy_error(&self) -> bool {
        is_edge_proxy_error_code(self.status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::Timings;

    fn reply(lines: &[&str]) -> Reply {
        Reply {
            effective_url: "https://example.org/final".to_string(),
            status_code: 200,
            header_lines: lines.iter().map(|l| l.to_string()).collect(),
            body: Some(b"hello".to_vec()),
            file_time: -1,
            ..Default::default()
        }
    }

    #[test]
    fn test_status_line_resets_headers() {
        let response = Response::from_reply(reply(&[
            "HTTP/1.1 301 Moved Permanently",
            "Location: /final",
            "X-Hop: 1",
            "HTTP/2 200 ",
            "Content-Type: text/html",
            "Content-Length: 5",
        ]));
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.plain_headers().len(), 2);
        assert!(!response.headers().has("x-hop"));
        assert_eq!(response.headers().content_type(), Some("text/html"));
        assert_eq!(response.content_length(), Some(5));
        // Empty reason phrase falls back to the table
        assert_eq!(response.reason_phrase(), Some("OK"));
        assert_eq!(response.content(), Some("hello"));
        assert_eq!(response.url(), Some("https://example.org/final"));
    }

    #[test]
    fn test_status_line_overrides_reply_code() {
        let response = Response::from_reply(reply(&["HTTP/1.1 522 Origin Timed Out"]));
        assert_eq!(response.status_code(), 522);
        assert_eq!(response.reason_phrase(), Some("Origin Timed Out"));
        assert!(response.is_edge_proxy_error());
        assert!(!response.is_redirect());
    }

    #[test]
    fn test_metrics_are_clamped() {
        let mut raw = reply(&[]);
        raw.download_size = -5;
        raw.download_speed = -1;
        raw.timings = Timings {
            start_transfer: 3.0,
            total: 1.0,
            ..Default::default()
        };
        let response = Response::from_reply(raw);
        assert_eq!(response.download_size(), Some(0));
        assert_eq!(response.download_speed(), Some(0));
        assert_eq!(response.download_time(), Some(0.0));
        assert_eq!(response.document_time(), None);
    }

    #[test]
    fn test_document_time_from_file_time() {
        let mut raw = reply(&[]);
        raw.file_time = 1_700_000_000;
        let response = Response::from_reply(raw);
        assert_eq!(
            response.document_time().map(|t| t.timestamp()),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn test_default_response() {
        let response = Response::default();
        assert_eq!(response.status_code(), 200);
        assert!(response.is_empty());
        assert_eq!(response.reason_phrase(), Some("OK"));
    }
}
