//! A single HTTP cookie.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{COOKIE_DELETION_AGE_SECS, COOKIE_RECORD_FIELDS, HTTP_ONLY_PREFIX};
use crate::error_handling::CookieError;
use crate::urls::raw_url_encode;
use crate::utils::clarify;

/// Format of `expires=` attributes in header lines.
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Characters of a cookie name that must be escaped in a header line.
const RESERVED_NAME_CHARS: [(char, &str); 9] = [
    ('=', "%3D"),
    (',', "%2C"),
    (';', "%3B"),
    (' ', "%20"),
    ('\t', "%09"),
    ('\r', "%0D"),
    ('\n', "%0A"),
    ('\u{0B}', "%0B"),
    ('\u{0C}', "%0C"),
];

/// One HTTP cookie.
///
/// A `None` value means "deleted". It packs as an empty field and renders as
/// `deleted` with an expiry in the past in header lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    name: String,
    value: Option<String>,
    host: String,
    path: String,
    expires_at: Option<DateTime<Utc>>,
    secure: bool,
    http_only: bool,
    include_subdomains: bool,
}

impl Default for Cookie {
    fn default() -> Self {
        Self {
            name: String::new(),
            value: None,
            host: String::new(),
            path: "/".to_string(),
            expires_at: None,
            secure: false,
            http_only: false,
            include_subdomains: false,
        }
    }
}

impl Cookie {
    /// Creates a session cookie with path `/` and no host.
    pub fn new(name: &str, value: Option<&str>) -> Self {
        let mut cookie = Cookie::default();
        cookie.set_name(name);
        cookie.set_value(value);
        cookie
    }

    /// Cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the name (trimmed).
    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    /// Cookie value; `None` for a deleted cookie.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Sets the value (trimmed; blank becomes `None`).
    pub fn set_value(&mut self, value: Option<&str>) {
        self.value = clarify(value);
    }

    /// Host the cookie belongs to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Sets the host (trimmed).
    pub fn set_host(&mut self, host: &str) {
        self.host = host.trim().to_string();
    }

    /// Cookie path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Sets the path (trimmed).
    pub fn set_path(&mut self, path: &str) {
        self.path = path.trim().to_string();
    }

    /// Expiry; `None` for a session cookie.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Sets the expiry.
    pub fn set_expires_at(&mut self, expires_at: Option<DateTime<Utc>>) {
        self.expires_at = expires_at;
    }

    /// Sets the expiry to `lifetime` seconds from now.
    pub fn set_lifetime(&mut self, lifetime: i64) {
        self.expires_at = Some(Self::expires_at_from_lifetime(lifetime));
    }

    /// Instant `lifetime` seconds from now (0 = now, negative = in the past).
    pub fn expires_at_from_lifetime(lifetime: i64) -> DateTime<Utc> {
        Utc::now() + Duration::seconds(lifetime)
    }

    /// Returns `true` if the cookie has an expiry at or before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Sent over secure connections only.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Sets the secure flag.
    pub fn set_secure(&mut self, secure: bool) {
        self.secure = secure;
    }

    /// Hidden from scripts.
    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    /// Sets the HttpOnly flag.
    pub fn set_http_only(&mut self, http_only: bool) {
        self.http_only = http_only;
    }

    /// Also sent to subdomains of `host`.
    pub fn is_include_subdomains(&self) -> bool {
        self.include_subdomains
    }

    /// Sets the include-subdomains flag.
    pub fn set_include_subdomains(&mut self, include_subdomains: bool) {
        self.include_subdomains = include_subdomains;
    }

    /// Serializes the cookie into its 7-field jar record.
    pub fn pack(&self) -> String {
        let host = if self.http_only {
            format!("{}{}", HTTP_ONLY_PREFIX, self.host)
        } else {
            self.host.clone()
        };
        [
            host,
            flag(self.include_subdomains).to_string(),
            self.path.clone(),
            flag(self.secure).to_string(),
            self.expires_at
                .map(|at| at.timestamp())
                .unwrap_or(0)
                .to_string(),
            self.name.clone(),
            self.value.clone().unwrap_or_default(),
        ]
        .join("\t")
    }

    /// Loads the cookie from a jar record.
    ///
    /// # Errors
    ///
    /// Returns `CookieError::MalformedRecord` if the record does not have exactly
    /// 7 fields. The cookie is left untouched in that case.
    pub fn unpack(&mut self, record: &str) -> Result<(), CookieError> {
        let fields: Vec<&str> = record.split('\t').collect();
        if fields.len() != COOKIE_RECORD_FIELDS {
            return Err(CookieError::MalformedRecord {
                fields: fields.len(),
            });
        }

        let (host, http_only) = match fields[0].strip_prefix(HTTP_ONLY_PREFIX) {
            Some(host) => (host, true),
            None => (fields[0], false),
        };
        self.set_host(host);
        self.http_only = http_only;
        self.include_subdomains = fields[1] == "TRUE";
        self.set_path(fields[2]);
        self.secure = fields[3] == "TRUE";
        self.expires_at = match fields[4].trim().parse::<i64>().unwrap_or(0) {
            0 => None,
            secs => DateTime::<Utc>::from_timestamp(secs, 0),
        };
        self.set_name(fields[5]);
        self.set_value(Some(fields[6]));
        Ok(())
    }

    /// Renders the cookie as a `Set-Cookie` style header line.
    ///
    /// A deleted cookie renders as `name=deleted` with an expiry one year in
    /// the past.
    pub fn to_header_line(&self) -> String {
        let mut name = String::with_capacity(self.name.len());
        for c in self.name.chars() {
            match RESERVED_NAME_CHARS.iter().find(|(r, _)| *r == c) {
                Some((_, escaped)) => name.push_str(escaped),
                None => name.push(c),
            }
        }

        let mut attributes = Vec::new();
        match &self.value {
            None => {
                attributes.push(format!("{}=deleted", name));
                let past = Utc::now() - Duration::seconds(COOKIE_DELETION_AGE_SECS);
                attributes.push(format!("expires={}", past.format(EXPIRES_FORMAT)));
            }
            Some(value) => {
                attributes.push(format!("{}={}", name, raw_url_encode(value)));
                if let Some(at) = self.expires_at {
                    attributes.push(format!("expires={}", at.format(EXPIRES_FORMAT)));
                }
            }
        }
        if !self.path.is_empty() {
            attributes.push(format!("path={}", self.path));
        }
        if !self.host.is_empty() {
            attributes.push(format!("domain={}", self.host));
        }
        if self.secure {
            attributes.push("secure".to_string());
        }
        if self.http_only {
            attributes.push("httponly".to_string());
        }
        attributes.join("; ")
    }
}

impl FromStr for Cookie {
    type Err = CookieError;

    fn from_str(record: &str) -> Result<Self, Self::Err> {
        let mut cookie = Cookie::default();
        cookie.unpack(record)?;
        Ok(cookie)
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "TRUE"
    } else {
        "FALSE"
    }
}
