//! Netscape-style cookie jar.
//!
//! The durable store behind a transport: cookies imported from jar records,
//! cookies received in `Set-Cookie` headers, and the `Cookie` header sent with
//! each request. Cookies are identified by (name, host, path); storing an
//! expired cookie removes its stored counterpart.

use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use log::debug;
use url::Url;

use crate::config::COOKIE_FILE_HEADER;
use crate::error_handling::CookieError;

use super::Cookie;

/// An in-memory cookie store with Netscape file persistence.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    /// Creates an empty jar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored cookies, in insertion order.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Number of stored cookies.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` when the jar holds nothing.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Stores a cookie, replacing any cookie with the same name, host and path.
    ///
    /// An already-expired cookie is not stored; it only removes its counterpart.
    pub fn insert(&mut self, cookie: Cookie) {
        let position = self.cookies.iter().position(|c| {
            c.name() == cookie.name()
                && c.host().eq_ignore_ascii_case(cookie.host())
                && c.path() == cookie.path()
        });
        let expired = cookie.is_expired(Utc::now());
        match (position, expired) {
            (Some(i), true) => {
                self.cookies.remove(i);
            }
            (Some(i), false) => self.cookies[i] = cookie,
            (None, true) => {}
            (None, false) => self.cookies.push(cookie),
        }
    }

    /// Imports one jar record.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::MalformedRecord` if the record is not a 7-field line.
    pub fn import_record(&mut self, record: &str) -> Result<(), CookieError> {
        let cookie: Cookie = record.parse()?;
        self.insert(cookie);
        Ok(())
    }

    /// Jar records of all live cookies.
    pub fn records(&self) -> Vec<String> {
        let now = Utc::now();
        self.cookies
            .iter()
            .filter(|c| !c.is_expired(now))
            .map(Cookie::pack)
            .collect()
    }

    /// Removes every cookie.
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Drops cookies whose expiry has passed.
    pub fn purge_expired(&mut self) {
        let now = Utc::now();
        self.cookies.retain(|c| !c.is_expired(now));
    }

    /// Stores the cookie described by one `Set-Cookie` header value.
    ///
    /// Understands `Domain`, `Path`, `Expires`, `Max-Age`, `Secure` and
    /// `HttpOnly`. Without `Domain` the cookie is bound to the request host;
    /// without `Path` it gets the directory of the request path.
    ///
    /// # Arguments
    ///
    /// * `url` - URL of the response that carried the header
    /// * `header` - Raw header value
    pub fn store_set_cookie(&mut self, url: &Url, header: &str) {
        let mut attributes = header.split(';');
        let Some((name, value)) = attributes.next().and_then(|pair| pair.split_once('=')) else {
            return;
        };
        if name.trim().is_empty() {
            return;
        }

        let mut cookie = Cookie::new(name, Some(value.trim().trim_matches('"')));
        cookie.set_host(url.host_str().unwrap_or_default());
        cookie.set_path(default_path(url));

        let mut max_age = None;
        for attribute in attributes {
            let attribute = attribute.trim();
            match attribute.split_once('=') {
                Some((key, v)) => match key.trim().to_ascii_lowercase().as_str() {
                    "domain" => {
                        let domain = v.trim().trim_start_matches('.');
                        if !domain.is_empty() {
                            cookie.set_host(domain);
                            cookie.set_include_subdomains(true);
                        }
                    }
                    "path" if v.trim().starts_with('/') => cookie.set_path(v),
                    "expires" => {
                        if let Some(at) = parse_cookie_date(v.trim()) {
                            cookie.set_expires_at(Some(at));
                        }
                    }
                    "max-age" => max_age = v.trim().parse::<i64>().ok(),
                    _ => {}
                },
                None => {
                    if attribute.eq_ignore_ascii_case("secure") {
                        cookie.set_secure(true);
                    } else if attribute.eq_ignore_ascii_case("httponly") {
                        cookie.set_http_only(true);
                    }
                }
            }
        }
        // Max-Age wins over Expires
        if let Some(seconds) = max_age {
            cookie.set_expires_at(Some(Utc::now() + Duration::seconds(seconds.min(i64::from(i32::MAX)))));
        }

        self.insert(cookie);
    }

    /// Builds the `Cookie` header value for a request to `url`.
    ///
    /// # Returns
    ///
    /// `name=value` pairs joined with `; `, or `None` if no cookie applies.
    pub fn request_header(&self, url: &Url) -> Option<String> {
        let host = url.host_str().unwrap_or_default();
        let path = url.path();
        let is_https = url.scheme() == "https";
        let now = Utc::now();

        let header = self
            .cookies
            .iter()
            .filter(|cookie| !cookie.is_expired(now))
            .filter(|cookie| domain_matches(cookie, host))
            .filter(|cookie| path_matches(cookie.path(), path))
            .filter(|cookie| !cookie.is_secure() || is_https)
            .map(|cookie| format!("{}={}", cookie.name(), cookie.value().unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("; ");

        if header.is_empty() {
            None
        } else {
            Some(header)
        }
    }

    /// Loads cookies from a Netscape cookie file.
    ///
    /// Comment and blank lines are skipped, as are malformed records. `#HttpOnly_`
    /// lines are records, not comments.
    ///
    /// # Returns
    ///
    /// The number of cookies imported.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read.
    pub fn load(&mut self, path: &Path) -> io::Result<usize> {
        let content = fs::read_to_string(path)?;
        let mut imported = 0;
        for line in content.lines() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || (line.starts_with('#') && !line.starts_with("#HttpOnly_")) {
                continue;
            }
            match self.import_record(line) {
                Ok(()) => imported += 1,
                Err(e) => debug!("Skipping cookie record in {}: {}", path.display(), e),
            }
        }
        Ok(imported)
    }

    /// Writes all live cookies to a Netscape cookie file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut content = String::from(COOKIE_FILE_HEADER);
        content.push_str("\n\n");
        for record in self.records() {
            content.push_str(&record);
            content.push('\n');
        }
        fs::write(path, content)
    }
}

/// Directory of the request path (RFC 6265 default-path).
fn default_path(url: &Url) -> &str {
    url.path()
        .rsplit_once('/')
        .map_or("/", |(dir, _)| if dir.is_empty() { "/" } else { dir })
}

fn domain_matches(cookie: &Cookie, host: &str) -> bool {
    let domain = cookie.host();
    if host.eq_ignore_ascii_case(domain) {
        return true;
    }
    cookie.is_include_subdomains()
        && host.len() > domain.len()
        && host.to_ascii_lowercase().ends_with(&format!(".{}", domain.to_ascii_lowercase()))
}

fn path_matches(cookie_path: &str, request_path: &str) -> bool {
    if cookie_path.is_empty() || cookie_path == request_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

fn parse_cookie_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc2822(value) {
        return Some(at.with_timezone(&Utc));
    }
    ["%a, %d-%b-%Y %H:%M:%S GMT", "%a, %d-%b-%y %H:%M:%S GMT"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}
