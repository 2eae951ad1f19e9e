//! HTTP client initialization.
//!
//! This module provides functions to initialize the blocking HTTP clients
//! behind `ReqwestTransport`: one that follows redirects itself and one that
//! leaves redirects to the context's redirect tracking.

use std::time::Duration;

use reqwest::blocking::{Client, ClientBuilder};
use reqwest::redirect::Policy;

use crate::config::Config;
use crate::fetch::Proxy;

/// Settings shared by both clients.
fn builder(
    config: &Config,
    proxy: Option<&Proxy>,
    connect_timeout: Duration,
) -> Result<ClientBuilder, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .connect_timeout(connect_timeout)
        .user_agent(config.user_agent.clone())
        .danger_accept_invalid_certs(!config.verify_tls);

    if let Some(proxy) = proxy {
        let mut reqwest_proxy = reqwest::Proxy::all(proxy.url())?;
        if let Some((username, password)) = &proxy.credentials {
            reqwest_proxy = reqwest_proxy.basic_auth(username, password);
        }
        builder = builder.proxy(reqwest_proxy);
    }
    Ok(builder)
}

/// Initializes the HTTP client that follows redirects on its own.
///
/// Creates a `reqwest::blocking::Client` configured with:
/// - User-Agent header and overall timeout from the configuration
/// - The given connect timeout and optional proxy
/// - Redirect following bounded by the configured redirect limit
///
/// # Arguments
///
/// * `config` - Context configuration (user agent, timeouts, TLS verification)
/// * `proxy` - Proxy to route through, if any
/// * `connect_timeout` - TCP connect timeout
///
/// # Returns
///
/// A configured HTTP client ready for making requests.
///
/// # Errors
///
/// Returns a `reqwest::Error` if the proxy URL is invalid or client creation fails.
pub fn init_client(
    config: &Config,
    proxy: Option<&Proxy>,
    connect_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    let policy = match config.redirects_limit {
        Some(limit) => Policy::limited(limit),
        None => Policy::limited(usize::MAX),
    };
    builder(config, proxy, connect_timeout)?.redirect(policy).build()
}

/// Initializes the HTTP client used for manual redirect tracking.
///
/// Creates a `reqwest::blocking::Client` with redirects disabled so every hop
/// comes back to the caller with its status and `Location` header.
///
/// # Arguments
///
/// * `config` - Context configuration (user agent, timeouts, TLS verification)
/// * `proxy` - Proxy to route through, if any
/// * `connect_timeout` - TCP connect timeout
///
/// # Returns
///
/// A configured HTTP client with redirects disabled.
///
/// # Errors
///
/// Returns a `reqwest::Error` if the proxy URL is invalid or client creation fails.
pub fn init_redirect_client(
    config: &Config,
    proxy: Option<&Proxy>,
    connect_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    builder(config, proxy, connect_timeout)?
        .redirect(Policy::none())
        .build()
}
