//! Request descriptors.

use std::fmt;

use crate::http::{Headers, Method};
use crate::urls::Query;

use super::{BodySink, Data, DataType, Options, Payload};

/// A request before it is sent.
///
/// Created by `Context::request` (or `Context::new_request`, which binds it to
/// the context). The context's options and headers are copied in at creation,
/// so later changes on either side do not leak into the other.
pub struct Request {
    url: String,
    method: Method,
    query: Option<Query>,
    options: Options,
    headers: Headers,
    default_data_type: Option<DataType>,
    sink: Option<Box<dyn BodySink>>,
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("query", &self.query)
            .field("options", &self.options)
            .field("headers", &self.headers)
            .field("default_data_type", &self.default_data_type)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Request {
    /// Creates a GET request with empty options and headers.
    pub fn new(url: &str) -> Self {
        Self::with_parts(url, Options::default(), Headers::new())
    }

    /// Creates a GET request with the given options and headers.
    pub fn with_parts(url: &str, options: Options, headers: Headers) -> Self {
        Self {
            url: url.to_string(),
            method: Method::Get,
            query: None,
            options,
            headers,
            default_data_type: None,
            sink: None,
        }
    }

    /// The URL as given, before normalization.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sets the URL.
    pub fn set_url(&mut self, url: &str) -> &mut Self {
        self.url = url.to_string();
        self
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Query merged into the URL during normalization.
    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Sets the query.
    pub fn set_query(&mut self, query: Option<Query>) -> &mut Self {
        self.query = query;
        self
    }

    /// The option bag.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable access to the option bag.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable access to the request headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Data type used when `to_post`/`to_put`/`to_patch` get none.
    pub fn default_data_type(&self) -> Option<&DataType> {
        self.default_data_type.as_ref()
    }

    /// Sets the fallback data type.
    pub fn set_default_data_type(&mut self, data_type: Option<DataType>) -> &mut Self {
        self.default_data_type = data_type;
        self
    }

    /// Encodes `data` as the body and announces its content type.
    ///
    /// Data that does not fit `data_type` leaves the request unchanged.
    pub fn set_data(&mut self, data: impl Into<Data>, data_type: Option<DataType>) -> &mut Self {
        if let Some(payload) = Payload::encode(data.into(), data_type.as_ref()) {
            self.headers.set_content_type(payload.content_type());
            self.options.payload = Some(payload);
        }
        self
    }

    /// Drops the body.
    pub fn remove_data(&mut self) -> &mut Self {
        self.options.remove_payload();
        self
    }

    /// Sets the method token sent on the wire without changing `method()`.
    pub fn set_custom_method(&mut self, method: Option<Method>) -> &mut Self {
        self.options.custom_method = method;
        self
    }

    /// Streams the body into `sink` instead of capturing it.
    pub fn set_sink(&mut self, sink: Box<dyn BodySink>) -> &mut Self {
        self.sink = Some(sink);
        self
    }

    /// Returns `true` if a body sink is attached.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub(crate) fn take_sink(&mut self) -> Option<Box<dyn BodySink>> {
        self.sink.take()
    }

    /// Turns the request into a body-less GET.
    pub fn to_get(&mut self) -> &mut Self {
        self.transition(Method::Get);
        self.remove_data()
    }

    /// Turns the request into a POST, optionally with a body.
    pub fn to_post(&mut self, data: Option<Data>, data_type: Option<DataType>) -> &mut Self {
        self.transition(Method::Post);
        self.apply_data(data, data_type)
    }

    /// Turns the request into a PUT, optionally with a body.
    pub fn to_put(&mut self, data: Option<Data>, data_type: Option<DataType>) -> &mut Self {
        self.transition(Method::Put);
        self.apply_data(data, data_type)
    }

    /// Turns the request into a PATCH, optionally with a body.
    pub fn to_patch(&mut self, data: Option<Data>, data_type: Option<DataType>) -> &mut Self {
        self.transition(Method::Patch);
        self.apply_data(data, data_type)
    }

    /// Turns the request into a body-less DELETE.
    pub fn to_delete(&mut self) -> &mut Self {
        self.transition(Method::Delete);
        self.remove_data()
    }

    /// Turns the request into a HEAD; the body is not fetched.
    pub fn to_head(&mut self) -> &mut Self {
        self.method = Method::Head;
        self.options.custom_method = None;
        self.options.no_body = true;
        self.options.include_headers = false;
        self.remove_data()
    }

    /// Turns the request into an OPTIONS call; header lines are prepended to the body.
    pub fn to_options(&mut self) -> &mut Self {
        self.method = Method::Options;
        self.options.custom_method = Some(Method::Options);
        self.options.no_body = false;
        self.options.include_headers = true;
        self.remove_data()
    }

    fn transition(&mut self, method: Method) {
        self.options.custom_method = Some(method.clone());
        self.options.no_body = false;
        self.options.include_headers = false;
        self.method = method;
    }

    fn apply_data(&mut self, data: Option<Data>, data_type: Option<DataType>) -> &mut Self {
        if let Some(data) = data {
            let data_type = data_type.or_else(|| self.default_data_type.clone());
            self.set_data(data, data_type);
        }
        self
    }
}
