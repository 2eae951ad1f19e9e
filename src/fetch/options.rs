//! Per-request transport options and payload encoding.
//!
//! `Options` is the option bag a `Context` hands to every new request by
//! value. Payloads are encoded eagerly: `Payload::encode` turns caller data
//! into the body form the transport sends, following the chosen `DataType`.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Map, Value};

use crate::config::{
    CONTENT_TYPE_JSON, CONTENT_TYPE_MULTIPART, CONTENT_TYPE_PLAIN, CONTENT_TYPE_URLENCODED,
};
use crate::http::Method;
use crate::urls::Query;
use crate::utils::{clarify, OneOrMany};

/// How request data is encoded into a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// `text/plain`, text only
    Plain,
    /// `multipart/form-data`, fields only; lists are flattened as `key[i]`
    Form,
    /// `application/json`, any data
    Json,
    /// `application/x-www-form-urlencoded`, fields only
    Query,
    /// Any other content type; the text is sent verbatim
    Other(String),
}

impl DataType {
    /// The `Content-Type` value announced for this data type.
    pub fn content_type(&self) -> &str {
        match self {
            DataType::Plain => CONTENT_TYPE_PLAIN,
            DataType::Form => CONTENT_TYPE_MULTIPART,
            DataType::Json => CONTENT_TYPE_JSON,
            DataType::Query => CONTENT_TYPE_URLENCODED,
            DataType::Other(content_type) => content_type,
        }
    }
}

/// Caller-supplied request data, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Data {
    /// Raw text
    Text(String),
    /// Named fields (lists allowed)
    Fields(Query),
    /// A structured value, meaningful for `DataType::Json`
    Value(Value),
}

impl From<&str> for Data {
    fn from(text: &str) -> Self {
        Data::Text(text.to_string())
    }
}

impl From<String> for Data {
    fn from(text: String) -> Self {
        Data::Text(text)
    }
}

impl From<Query> for Data {
    fn from(fields: Query) -> Self {
        Data::Fields(fields)
    }
}

impl From<Value> for Data {
    fn from(value: Value) -> Self {
        Data::Value(value)
    }
}

/// An encoded request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// `text/plain` body
    Plain(String),
    /// URL-encoded form body
    UrlEncoded(String),
    /// Multipart fields, already flattened
    Multipart(Vec<(String, String)>),
    /// JSON document
    Json(String),
    /// Verbatim body with a caller-chosen content type
    Custom {
        /// Body text
        body: String,
        /// Announced content type
        content_type: String,
    },
}

impl Payload {
    /// Encodes `data` according to `data_type`.
    ///
    /// Without a type, fields are URL-encoded and text is sent as plain text.
    /// Data that does not fit the chosen type is ignored.
    ///
    /// # Returns
    ///
    /// The payload, or `None` if the data cannot be expressed in that type.
    pub fn encode(data: Data, data_type: Option<&DataType>) -> Option<Payload> {
        match (data_type, data) {
            (Some(DataType::Plain), Data::Text(text)) | (None, Data::Text(text)) => {
                Some(Payload::Plain(text))
            }
            (Some(DataType::Form), Data::Fields(fields)) => {
                Some(Payload::Multipart(fields.flatten()))
            }
            (Some(DataType::Json), data) => Some(Payload::Json(json_body(data))),
            (Some(DataType::Query), Data::Fields(fields)) | (None, Data::Fields(fields)) => {
                Some(Payload::UrlEncoded(fields.to_form_body()))
            }
            (Some(DataType::Other(content_type)), Data::Text(body)) => Some(Payload::Custom {
                body,
                content_type: content_type.clone(),
            }),
            _ => None,
        }
    }

    /// The `Content-Type` value this payload is sent with.
    pub fn content_type(&self) -> &str {
        match self {
            Payload::Plain(_) => CONTENT_TYPE_PLAIN,
            Payload::UrlEncoded(_) => CONTENT_TYPE_URLENCODED,
            Payload::Multipart(_) => CONTENT_TYPE_MULTIPART,
            Payload::Json(_) => CONTENT_TYPE_JSON,
            Payload::Custom { content_type, .. } => content_type,
        }
    }
}

fn json_body(data: Data) -> String {
    let value = match data {
        Data::Text(text) => Value::String(text),
        Data::Value(value) => value,
        Data::Fields(fields) => {
            let object: Map<String, Value> = fields
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        OneOrMany::One(v) => Value::String(v.clone()),
                        OneOrMany::Many(vs) => {
                            Value::Array(vs.iter().cloned().map(Value::String).collect())
                        }
                    };
                    (key.to_string(), value)
                })
                .collect();
            Value::Object(object)
        }
    };
    value.to_string()
}

/// Proxy settings for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    /// Proxy host (may include a scheme)
    pub host: String,
    /// Proxy port
    pub port: Option<u16>,
    /// Username and password
    pub credentials: Option<(String, String)>,
}

impl Proxy {
    /// The proxy URL as `scheme://host[:port]`, defaulting to `http`.
    pub fn url(&self) -> String {
        let host = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("http://{}", self.host)
        };
        match self.port {
            Some(port) => format!("{}:{}", host.trim_end_matches('/'), port),
            None => host,
        }
    }
}

/// The option bag applied to one exchange.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    /// Explicit method token sent on the wire
    pub custom_method: Option<Method>,
    /// Encoded request body
    pub payload: Option<Payload>,
    /// `Referer` header value
    pub referer: Option<String>,
    /// Overrides the configured user agent
    pub user_agent: Option<String>,
    /// URL sent as-is, bypassing normalization
    pub direct_url: Option<String>,
    /// Basic credentials as `user[:pass]`
    pub authority: Option<String>,
    /// Proxy to route through
    pub proxy: Option<Proxy>,
    /// Let the transport follow redirects itself
    pub follow_redirects: bool,
    /// Do not fetch a body
    pub no_body: bool,
    /// Prepend response header lines to the body
    pub include_headers: bool,
    /// Overall exchange timeout
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// Cookie file read when the transport starts
    pub cookie_read_file: Option<PathBuf>,
    /// Cookie file written when cookies are saved
    pub cookie_write_file: Option<PathBuf>,
}

impl Options {
    /// Creates an empty option bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the referer; an empty value clears it.
    pub fn set_referer(&mut self, referer: Option<&str>) {
        self.referer = clarify(referer);
    }

    /// Sets the user agent; an empty value clears it.
    pub fn set_user_agent(&mut self, user_agent: Option<&str>) {
        self.user_agent = clarify(user_agent);
    }

    /// Sets the direct URL; an empty value clears it.
    pub fn set_direct_url(&mut self, url: Option<&str>) {
        self.direct_url = clarify(url);
    }

    /// Sets basic credentials, joined as `user:pass` when a password is given.
    pub fn set_authority(&mut self, username: &str, password: Option<&str>) {
        self.authority = match password {
            Some(password) => Some(format!("{}:{}", username, password)),
            None => clarify(Some(username)),
        };
    }

    /// Splits the authority into username and optional password.
    pub fn credentials(&self) -> Option<(&str, Option<&str>)> {
        let authority = self.authority.as_deref()?;
        Some(match authority.split_once(':') {
            Some((user, pass)) => (user, Some(pass)),
            None => (authority, None),
        })
    }

    /// Routes requests through a proxy; credentials apply only when both parts are given.
    pub fn set_proxy(
        &mut self,
        host: &str,
        port: Option<u16>,
        username: Option<&str>,
        password: Option<&str>,
    ) {
        self.proxy = clarify(Some(host)).map(|host| Proxy {
            host,
            port,
            credentials: username
                .zip(password)
                .map(|(u, p)| (u.to_string(), p.to_string())),
        });
    }

    /// Uses one file for both reading and writing cookies.
    pub fn set_cookie_file(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.cookie_read_file = Some(path.clone());
        self.cookie_write_file = Some(path);
    }

    /// Drops the request body.
    pub fn remove_payload(&mut self) {
        self.payload = None;
    }
}
