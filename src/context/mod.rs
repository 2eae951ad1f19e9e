//! The crawling context.
//!
//! A `Context` is the host identity (domain, subdomain, default path, scheme,
//! default query) plus the policies and state that drive requests against it:
//! redirect policy, cookie queue, pipelines, response history, the transport
//! handle and the event hooks.
//!
//! The routines are split across submodules:
//! - `normalize`: URL composition and normalization
//! - `send`: request creation, the exchange loop and `BoundRequest`
//! - `cookies`: the cookie queue and jar access
//! - `pipelines`: method-keyed pipelines
//! - `download`: file downloads

mod cookies;
mod download;
mod normalize;
mod pipelines;
mod send;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::config::{Config, DEFAULT_FILE_MODE};
use crate::cookies::Cookie;
use crate::error_handling::CrawlerError;
use crate::fetch::{
    reqwest_connector, Connector, CrawlerHooks, DataType, NoHooks, Options, Response, Transport,
};
use crate::http::Headers;
use crate::pipeline::Pipeline;
use crate::urls::Query;
use crate::utils::clarify;

// Re-export public API
pub use normalize::UrlOverrides;
pub use pipelines::{PipelineChoice, PipelineKey};
pub use send::BoundRequest;

/// Host identity, request policies and per-call state.
///
/// One context is driven by one caller at a time; concurrent callers each
/// need their own context.
pub struct Context {
    config: Config,
    connector: Connector,
    transport: Option<Box<dyn Transport>>,

    domain: String,
    subdomain: Option<String>,
    path: Option<String>,
    secured: bool,
    query: Option<Query>,

    options: Options,
    headers: Headers,
    default_data_type: Option<DataType>,
    encode_urls: bool,

    cookies_queue: Vec<Cookie>,
    responses: Vec<Response>,

    redirects_allowed: bool,
    redirects_limit: Option<usize>,
    persist_transport: bool,
    strict_path_handling: bool,

    verbose: bool,
    verbose_output: String,
    persist_verbose_output: bool,

    download_path: Option<PathBuf>,
    override_file_mode: Option<u32>,
    use_remote_time: bool,

    pipelines: HashMap<PipelineKey, Pipeline>,
    pipelines_active: bool,

    hooks: Box<dyn CrawlerHooks>,
}

impl Context {
    /// Creates a context with the default configuration and transport.
    ///
    /// A `www.` prefix on `domain` moves into the subdomain when no subdomain is given.
    ///
    /// # Arguments
    ///
    /// * `domain` - Registrable domain, e.g. `example.org`
    /// * `subdomain` - Optional subdomain, e.g. `api`
    pub fn new(domain: &str, subdomain: Option<&str>) -> Self {
        Self::from_config(Config::default(), domain, subdomain)
    }

    /// Creates a context from a configuration, using the reqwest transport.
    pub fn from_config(config: Config, domain: &str, subdomain: Option<&str>) -> Self {
        Self::with_transport(config, domain, subdomain, reqwest_connector())
    }

    /// Creates a context whose transport handles are built by `connector`.
    ///
    /// The connector runs lazily, on the first exchange or an explicit `initialize`.
    pub fn with_transport(
        config: Config,
        domain: &str,
        subdomain: Option<&str>,
        connector: Connector,
    ) -> Self {
        let mut domain = domain.trim().to_string();
        let mut subdomain = clarify(subdomain);
        if subdomain.is_none()
            && domain.len() > 4
            && domain.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www."))
        {
            subdomain = Some("www".to_string());
            domain = domain[4..].to_string();
        }

        Self {
            connector,
            transport: None,
            domain,
            subdomain,
            path: None,
            secured: config.secured,
            query: None,
            options: Options::default(),
            headers: Headers::new(),
            default_data_type: None,
            encode_urls: config.encode_urls,
            cookies_queue: Vec::new(),
            responses: Vec::new(),
            redirects_allowed: config.redirects_allowed,
            redirects_limit: config.redirects_limit.filter(|&limit| limit > 0),
            persist_transport: config.persist_transport,
            strict_path_handling: config.strict_path_handling,
            verbose: config.verbose,
            verbose_output: String::new(),
            persist_verbose_output: false,
            download_path: None,
            override_file_mode: Some(DEFAULT_FILE_MODE),
            use_remote_time: true,
            pipelines: HashMap::new(),
            pipelines_active: config.pipelines_active,
            hooks: Box::new(NoHooks),
            config,
        }
    }

    /// The configuration the context was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // Identity

    /// The domain.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Sets the domain (trimmed).
    pub fn set_domain(&mut self, domain: &str) {
        self.domain = domain.trim().to_string();
    }

    /// The subdomain.
    pub fn subdomain(&self) -> Option<&str> {
        self.subdomain.as_deref()
    }

    /// Sets the subdomain; a blank value clears it.
    pub fn set_subdomain(&mut self, subdomain: Option<&str>) {
        self.subdomain = clarify(subdomain);
    }

    /// `subdomain.domain`, or the domain alone.
    pub fn host(&self) -> String {
        self.host_for(None)
    }

    /// The host for another subdomain, falling back to the context's own.
    pub fn host_for(&self, subdomain: Option<&str>) -> String {
        let subdomain = clarify(subdomain).or_else(|| self.subdomain.clone());
        match subdomain {
            Some(subdomain) => format!("{}.{}", subdomain, self.domain),
            None => self.domain.clone(),
        }
    }

    /// The default path, stored without a leading slash.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Sets the default path; leading slashes are stripped and a blank value clears it.
    pub fn set_path(&mut self, path: Option<&str>) {
        self.path = clarify(path.map(|p| p.trim().trim_start_matches('/')));
    }

    /// Whether `https` is the default scheme.
    pub fn is_secured(&self) -> bool {
        self.secured
    }

    /// Switches the default scheme.
    pub fn set_secured(&mut self, secured: bool) {
        self.secured = secured;
    }

    /// `https` or `http`.
    pub fn scheme(&self) -> &'static str {
        if self.secured {
            "https"
        } else {
            "http"
        }
    }

    /// The default query merged into every normalized URL.
    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    /// Sets the default query.
    pub fn set_query(&mut self, query: Option<Query>) {
        self.query = query;
    }

    // Request defaults

    /// Options copied into every new request.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable access to the default options.
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Replaces the default options.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// Headers copied into every new request.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable access to the default headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Marks new requests as AJAX calls.
    pub fn set_xhr(&mut self, xhr: bool) {
        self.headers.set_xhr(xhr);
    }

    /// Returns `true` if new requests carry the AJAX marker.
    pub fn is_xhr(&self) -> bool {
        self.headers.is_xhr()
    }

    /// Data type new requests fall back to.
    pub fn default_data_type(&self) -> Option<&DataType> {
        self.default_data_type.as_ref()
    }

    /// Sets the fallback data type.
    pub fn set_default_data_type(&mut self, data_type: Option<DataType>) {
        self.default_data_type = data_type;
    }

    /// Whether caller URLs are percent-encoded before parsing.
    pub fn is_encode_urls(&self) -> bool {
        self.encode_urls
    }

    /// Enables or disables URL encoding.
    pub fn set_encode_urls(&mut self, encode_urls: bool) {
        self.encode_urls = encode_urls;
    }

    // Policies

    /// Whether redirects are followed through the redirect state machine.
    pub fn is_redirects_allowed(&self) -> bool {
        self.redirects_allowed
    }

    /// Allows or disallows redirect following.
    pub fn set_redirects_allowed(&mut self, allowed: bool) {
        self.redirects_allowed = allowed;
    }

    /// Maximum number of hops; `None` is unlimited.
    pub fn redirects_limit(&self) -> Option<usize> {
        self.redirects_limit
    }

    /// Sets the hop limit; `0` or `None` removes the limit.
    pub fn set_redirects_limit(&mut self, limit: Option<usize>) {
        self.redirects_limit = limit.filter(|&l| l > 0);
    }

    /// Whether the transport handle is reused across calls.
    pub fn is_persist_transport(&self) -> bool {
        self.persist_transport
    }

    /// Enables or disables handle reuse.
    pub fn set_persist_transport(&mut self, persist: bool) {
        self.persist_transport = persist;
    }

    /// Whether the default path is treated as a directory.
    pub fn is_strict_path_handling(&self) -> bool {
        self.strict_path_handling
    }

    /// Enables or disables strict path handling.
    pub fn set_strict_path_handling(&mut self, strict: bool) {
        self.strict_path_handling = strict;
    }

    // Verbose capture

    /// Whether exchanges are traced.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Enables or disables tracing.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// The captured trace.
    pub fn verbose_output(&self) -> &str {
        &self.verbose_output
    }

    /// Keeps the trace across calls instead of clearing it before each one.
    pub fn set_persist_verbose_output(&mut self, persist: bool) {
        self.persist_verbose_output = persist;
    }

    /// Whether the trace is kept across calls.
    pub fn is_persist_verbose_output(&self) -> bool {
        self.persist_verbose_output
    }

    /// Discards the captured trace.
    pub fn clear_verbose_output(&mut self) {
        self.verbose_output.clear();
    }

    // Downloads

    /// Directory relative destinations are resolved against.
    pub fn download_path(&self) -> Option<&Path> {
        self.download_path.as_deref()
    }

    /// Sets the download directory.
    pub fn set_download_path(&mut self, path: Option<PathBuf>) {
        self.download_path = path;
    }

    /// Mode applied to downloaded files (unix only).
    pub fn override_file_mode(&self) -> Option<u32> {
        self.override_file_mode
    }

    /// Sets the mode applied to downloaded files.
    pub fn set_override_file_mode(&mut self, mode: Option<u32>) {
        self.override_file_mode = mode;
    }

    /// Whether downloaded files get the remote modification time.
    pub fn is_use_remote_time(&self) -> bool {
        self.use_remote_time
    }

    /// Enables or disables applying the remote modification time.
    pub fn set_use_remote_time(&mut self, use_remote_time: bool) {
        self.use_remote_time = use_remote_time;
    }

    // Hooks

    /// Installs the event hooks.
    pub fn set_hooks(&mut self, hooks: Box<dyn CrawlerHooks>) {
        self.hooks = hooks;
    }

    // Response history

    /// The last response of the most recent call.
    pub fn response(&self) -> Option<&Response> {
        self.responses.last()
    }

    /// Every response of the most recent call, redirect hops included.
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Forgets the response history.
    pub fn clear_responses(&mut self) {
        self.responses.clear();
    }

    /// Effective URL of the last response.
    pub fn last_url(&self) -> Option<&str> {
        self.response().and_then(Response::url)
    }

    /// Status code of the last response.
    pub fn last_status_code(&self) -> Option<u16> {
        self.response().map(Response::status_code)
    }

    /// Reason phrase of the last response.
    pub fn last_reason_phrase(&self) -> Option<&str> {
        self.response().and_then(Response::reason_phrase)
    }

    /// Redirect target of the last response.
    pub fn last_redirect_url(&self) -> Option<&str> {
        self.response().and_then(Response::redirect_url)
    }

    // Transport lifecycle

    /// Returns `true` when a transport handle is open.
    pub fn is_transport_initialized(&self) -> bool {
        self.transport.is_some()
    }

    /// Opens the transport handle if none is open.
    ///
    /// A configured cookie read file is loaded into the new handle's jar.
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::TransportInit` if the connector fails.
    pub fn initialize(&mut self) -> Result<(), CrawlerError> {
        if self.transport.is_some() {
            return Ok(());
        }
        let mut transport = (self.connector)(&self.config)?;
        if let Some(path) = &self.options.cookie_read_file {
            match transport.load_cookies(path) {
                Ok(count) => debug!("Loaded {} cookies from {}", count, path.display()),
                Err(e) => debug!("Cookie file {} not loaded: {}", path.display(), e),
            }
        }
        self.transport = Some(transport);
        Ok(())
    }

    /// Closes the current handle and opens a fresh one.
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::TransportInit` if the connector fails.
    pub fn reinitialize(&mut self) -> Result<(), CrawlerError> {
        self.close();
        self.initialize()
    }

    /// Closes the transport handle, writing the cookie write file if one is configured.
    pub fn close(&mut self) {
        let Some(transport) = self.transport.take() else {
            return;
        };
        if let Some(path) = &self.options.cookie_write_file {
            if let Err(e) = transport.save_cookies(path) {
                warn!("Failed to write cookies to {}: {}", path.display(), e);
            }
        }
    }

    fn transport_mut(&mut self) -> Result<&mut Box<dyn Transport>, CrawlerError> {
        self.initialize()?;
        self.transport
            .as_mut()
            .ok_or_else(|| CrawlerError::TransportInit("transport handle unavailable".to_string()))
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests;
