//! Event hooks fired by the context while sending.
//!
//! Each event carries an `accepted` flag that a hook may clear to veto the
//! operation. The context checks the flag once after the hook returns.

use std::path::Path;

use super::{Request, Response};

/// Fired before a request is sent.
///
/// A hook may veto the call or rewrite the URL that will be fetched.
#[derive(Debug)]
pub struct RequestEvent<'a> {
    request: &'a Request,
    effective_url: String,
    accepted: bool,
}

impl<'a> RequestEvent<'a> {
    /// Creates an accepted event for `request` about to fetch `effective_url`.
    pub fn new(request: &'a Request, effective_url: String) -> Self {
        Self {
            request,
            effective_url,
            accepted: true,
        }
    }

    /// The request being sent.
    pub fn request(&self) -> &Request {
        self.request
    }

    /// The normalized URL that will be fetched.
    pub fn effective_url(&self) -> &str {
        &self.effective_url
    }

    /// Rewrites the URL that will be fetched.
    pub fn set_effective_url(&mut self, url: &str) {
        self.effective_url = url.trim().to_string();
    }

    /// Lets the request proceed.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Vetoes the request.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }

    /// Returns `true` unless vetoed.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Returns `true` if vetoed.
    pub fn is_ignored(&self) -> bool {
        !self.accepted
    }

    pub(crate) fn into_effective_url(self) -> String {
        self.effective_url
    }
}

/// Fired before a redirect hop is followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectEvent {
    location: String,
    status_code: u16,
    count: usize,
    accepted: bool,
}

impl RedirectEvent {
    /// Creates an accepted event for hop `count` (1-based).
    pub fn new(location: String, status_code: u16, count: usize) -> Self {
        Self {
            location,
            status_code,
            count,
            accepted: true,
        }
    }

    /// Absolute target of the redirect.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Rewrites the redirect target.
    pub fn set_location(&mut self, location: &str) {
        self.location = location.trim().to_string();
    }

    /// Status code of the redirect response.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// 1-based hop count.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Lets the redirect be followed.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Stops following; the redirect response becomes the result.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }

    /// Returns `true` unless vetoed.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Returns `true` if vetoed.
    pub fn is_ignored(&self) -> bool {
        !self.accepted
    }

    pub(crate) fn into_location(self) -> String {
        self.location
    }
}

/// Fired after a file was downloaded.
///
/// The context vetoes non-200 responses and empty files before the hook runs.
#[derive(Debug)]
pub struct DownloadEvent<'a> {
    destination: &'a Path,
    response: &'a Response,
    accepted: bool,
}

impl<'a> DownloadEvent<'a> {
    /// Creates an event for a file written to `destination`.
    pub fn new(destination: &'a Path, response: &'a Response, accepted: bool) -> Self {
        Self {
            destination,
            response,
            accepted,
        }
    }

    /// Where the file was written.
    pub fn destination(&self) -> &Path {
        self.destination
    }

    /// The response that produced the file.
    pub fn response(&self) -> &Response {
        self.response
    }

    /// Keeps the file.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Rejects the file; it will be removed.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }

    /// Returns `true` unless vetoed.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Returns `true` if vetoed.
    pub fn is_ignored(&self) -> bool {
        !self.accepted
    }
}

/// Receives the context's events. Every method defaults to a no-op.
pub trait CrawlerHooks: Send {
    /// Called before each `send`.
    fn on_request(&mut self, _event: &mut RequestEvent<'_>) {}

    /// Called before each redirect hop is followed.
    fn on_redirect(&mut self, _event: &mut RedirectEvent) {}

    /// Called after a download finished.
    fn on_download(&mut self, _event: &mut DownloadEvent<'_>) {}
}

/// Hooks that accept everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl CrawlerHooks for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_event_veto_and_rewrite() {
        let mut event = RedirectEvent::new("https://a.example/".to_string(), 302, 1);
        assert!(event.is_accepted());
        event.set_location("  https://b.example/ ");
        event.ignore();
        assert!(event.is_ignored());
        assert_eq!(event.location(), "https://b.example/");
        assert_eq!(event.into_location(), "https://b.example/");
    }

    #[test]
    fn test_request_event_rewrites_url() {
        let request = Request::new("foo");
        let mut event = RequestEvent::new(&request, "https://example.org/foo".to_string());
        event.set_effective_url(" https://example.org/bar ");
        assert_eq!(event.request().url(), "foo");
        assert_eq!(event.into_effective_url(), "https://example.org/bar");
    }

    #[test]
    fn test_download_event_starts_with_given_verdict() {
        let response = Response::default();
        let path = Path::new("/tmp/file.bin");
        let mut event = DownloadEvent::new(path, &response, false);
        assert!(event.is_ignored());
        event.accept();
        assert!(event.is_accepted());
        assert_eq!(event.destination(), path);
    }
}
