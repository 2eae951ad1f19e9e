//! Cookie queue and jar access.
//!
//! Queued cookies apply to the next exchange only: they are packed into the
//! transport jar right before it and the queue is drained. The jar itself is
//! owned by the transport.

use log::debug;

use crate::cookies::Cookie;
use crate::error_handling::CrawlerError;

use super::Context;

impl Context {
    /// Queues a cookie for the next exchange.
    pub fn add_cookie(&mut self, cookie: Cookie) {
        self.cookies_queue.push(cookie);
    }

    /// Queues several cookies, in order.
    pub fn add_cookies(&mut self, cookies: impl IntoIterator<Item = Cookie>) {
        self.cookies_queue.extend(cookies);
    }

    /// Empties the jar and the queue, then queues `cookies`.
    pub fn replace_cookies(&mut self, cookies: impl IntoIterator<Item = Cookie>) {
        self.clear_cookies();
        self.cookies_queue.extend(cookies);
    }

    /// Queues a cookie scoped to the context host.
    ///
    /// # Arguments
    ///
    /// * `name` - Cookie name
    /// * `value` - Cookie value; `None` marks it deleted
    /// * `lifetime` - Seconds from now until expiry; `None` for a session cookie
    /// * `path` - Cookie path; defaults to `/` plus the context path
    pub fn add_simple_cookie(
        &mut self,
        name: &str,
        value: Option<&str>,
        lifetime: Option<i64>,
        path: Option<&str>,
    ) {
        let mut cookie = Cookie::new(name, value);
        cookie.set_host(&self.host());
        cookie.set_secure(self.secured);
        match path {
            Some(path) => cookie.set_path(path),
            None => cookie.set_path(&format!("/{}", self.path.as_deref().unwrap_or(""))),
        }
        if let Some(lifetime) = lifetime {
            cookie.set_lifetime(lifetime);
        }
        self.add_cookie(cookie);
    }

    /// Queues session cookies from name/value pairs.
    pub fn add_simple_cookies<'a>(&mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (name, value) in pairs {
            self.add_simple_cookie(name, Some(value), None, None);
        }
    }

    /// Cookies waiting for the next exchange.
    pub fn queued_cookies(&self) -> &[Cookie] {
        &self.cookies_queue
    }

    /// Moves queued cookies into the transport jar.
    ///
    /// Does nothing until a transport is initialized, so the queue survives
    /// until the first exchange.
    pub fn flush_cookies(&mut self) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        for cookie in self.cookies_queue.drain(..) {
            transport.import_cookie(&cookie.pack());
        }
    }

    /// Flushes the queue, then reads every cookie back from the jar.
    ///
    /// Malformed jar records are skipped.
    pub fn obtain_cookies(&mut self) -> Vec<Cookie> {
        self.flush_cookies();
        let Some(transport) = self.transport.as_ref() else {
            return Vec::new();
        };
        transport
            .cookie_records()
            .iter()
            .filter_map(|record| match record.parse::<Cookie>() {
                Ok(cookie) => Some(cookie),
                Err(e) => {
                    debug!("Skipping jar record {:?}: {}", record, e);
                    None
                }
            })
            .collect()
    }

    /// Empties the jar and the queue.
    pub fn clear_cookies(&mut self) {
        if let Some(transport) = self.transport.as_mut() {
            transport.clear_cookies();
        }
        self.cookies_queue.clear();
    }

    /// Loads the configured cookie read file into the jar.
    ///
    /// # Returns
    ///
    /// The number of records imported; `0` when no transport is open or no file is set.
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::Io` if the file cannot be read.
    pub fn load_cookies_from_file(&mut self) -> Result<usize, CrawlerError> {
        let (Some(transport), Some(path)) =
            (self.transport.as_mut(), self.options.cookie_read_file.as_ref())
        else {
            return Ok(0);
        };
        Ok(transport.load_cookies(path)?)
    }

    /// Writes the jar to the configured cookie write file.
    ///
    /// # Returns
    ///
    /// `false` when no transport is open or no file is set.
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::Io` if the file cannot be written.
    pub fn save_cookies_to_file(&mut self) -> Result<bool, CrawlerError> {
        self.flush_cookies();
        let (Some(transport), Some(path)) =
            (self.transport.as_ref(), self.options.cookie_write_file.as_ref())
        else {
            return Ok(false);
        };
        transport.save_cookies(path)?;
        Ok(true)
    }
}
