//! Default transport over blocking `reqwest` clients.

use std::fmt::Write as _;
use std::io::{self, Read};
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::DateTime;
use log::debug;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{COOKIE, LAST_MODIFIED, LOCATION, REFERER, SET_COOKIE, USER_AGENT};
use url::Url;

use crate::config::{
    Config, HEADER_CONTENT_TYPE, HEADER_COOKIE, TRANSPORT_CODE_RECV_ERROR,
    TRANSPORT_CODE_URL_MALFORMAT, TRANSPORT_CODE_WRITE_ERROR,
};
use crate::cookies::CookieJar;
use crate::error_handling::{
    transport_failure_from_io, transport_failure_from_reqwest, InitializationError,
    TransportFailure,
};
use crate::fetch::{Options, Payload, Proxy};
use crate::http::Method;
use crate::initialization::{init_client, init_redirect_client};
use crate::urls::complete_url;

use super::{BodySink, Exchange, Reply, Timings, Transport};

/// A `Transport` backed by two blocking reqwest clients.
///
/// One client follows redirects itself (used when `Options::follow_redirects`
/// is set), the other never does. Both are rebuilt when an exchange asks for a
/// different proxy or connect timeout. Cookies live in an owned `CookieJar`.
pub struct ReqwestTransport {
    config: Config,
    following: Client,
    manual: Client,
    proxy: Option<Proxy>,
    connect_timeout: Duration,
    jar: CookieJar,
}

impl ReqwestTransport {
    /// Builds both clients from the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if a client cannot be built.
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        let connect_timeout = config.connect_timeout;
        Ok(Self {
            following: init_client(config, None, connect_timeout)?,
            manual: init_redirect_client(config, None, connect_timeout)?,
            config: config.clone(),
            proxy: None,
            connect_timeout,
            jar: CookieJar::new(),
        })
    }

    /// The cookie jar.
    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    fn refresh_clients(&mut self, options: &Options) -> Result<(), TransportFailure> {
        let connect_timeout = options
            .connect_timeout
            .unwrap_or(self.config.connect_timeout);
        if options.proxy == self.proxy && connect_timeout == self.connect_timeout {
            return Ok(());
        }
        debug!(
            "Rebuilding HTTP clients (proxy: {:?}, connect timeout: {:?})",
            options.proxy.as_ref().map(Proxy::url),
            connect_timeout
        );
        let proxy = options.proxy.as_ref();
        self.following = init_client(&self.config, proxy, connect_timeout)
            .map_err(|e| transport_failure_from_reqwest(&e))?;
        self.manual = init_redirect_client(&self.config, proxy, connect_timeout)
            .map_err(|e| transport_failure_from_reqwest(&e))?;
        self.proxy = options.proxy.clone();
        self.connect_timeout = connect_timeout;
        Ok(())
    }

    fn prepare(&self, exchange: &Exchange, url: &Url) -> Result<RequestBuilder, TransportFailure> {
        let options = &exchange.options;
        let client = if options.follow_redirects {
            &self.following
        } else {
            &self.manual
        };
        let method = reqwest::Method::from_bytes(exchange.wire_method().as_str().as_bytes())
            .map_err(|e| TransportFailure::new(TRANSPORT_CODE_URL_MALFORMAT, e.to_string()))?;
        let mut builder = client.request(method, url.clone());

        let multipart = matches!(options.payload, Some(Payload::Multipart(_)));
        let mut has_cookie_header = false;
        for line in &exchange.header_lines {
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim();
            // reqwest announces its own multipart boundary
            if multipart && name.eq_ignore_ascii_case(HEADER_CONTENT_TYPE) {
                continue;
            }
            has_cookie_header |= name.eq_ignore_ascii_case(HEADER_COOKIE);
            builder = builder.header(name, value.trim());
        }

        if let Some(user_agent) = &options.user_agent {
            builder = builder.header(USER_AGENT, user_agent.as_str());
        }
        if let Some(referer) = &options.referer {
            builder = builder.header(REFERER, referer.as_str());
        }
        if !has_cookie_header {
            if let Some(cookies) = self.jar.request_header(url) {
                builder = builder.header(COOKIE, cookies);
            }
        }
        if let Some((username, password)) = options.credentials() {
            builder = builder.basic_auth(username, password);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &options.payload {
            Some(Payload::Multipart(fields)) => {
                let form = fields
                    .iter()
                    .fold(Form::new(), |form, (name, value)| {
                        form.text(name.clone(), value.clone())
                    });
                builder.multipart(form)
            }
            Some(Payload::Plain(body))
            | Some(Payload::UrlEncoded(body))
            | Some(Payload::Json(body))
            | Some(Payload::Custom { body, .. }) => builder.body(body.clone()),
            None => builder,
        };
        Ok(builder)
    }
}

impl Transport for ReqwestTransport {
    fn exchange(
        &mut self,
        exchange: &Exchange,
        sink: Option<&mut dyn BodySink>,
    ) -> Result<Reply, TransportFailure> {
        self.refresh_clients(&exchange.options)?;
        let url = Url::parse(&exchange.url)
            .map_err(|e| TransportFailure::new(TRANSPORT_CODE_URL_MALFORMAT, e.to_string()))?;
        let builder = self.prepare(exchange, &url)?;

        let started = Instant::now();
        let mut response = builder
            .send()
            .map_err(|e| transport_failure_from_reqwest(&e))?;
        let start_transfer = started.elapsed();

        let status = response.status();
        let effective_url = response.url().clone();
        let status_line = format!(
            "{:?} {} {}",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        );
        let mut header_lines = vec![status_line.trim_end().to_string()];
        for (name, value) in response.headers() {
            header_lines.push(format!("{}: {}", name, String::from_utf8_lossy(value.as_bytes())));
        }

        for set_cookie in response.headers().get_all(SET_COOKIE) {
            if let Ok(value) = set_cookie.to_str() {
                self.jar.store_set_cookie(&effective_url, value);
            }
        }

        let redirect_url = if status.is_redirection() {
            response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(|location| complete_url(location, effective_url.as_str()))
        } else {
            None
        };

        let file_time = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| DateTime::parse_from_rfc2822(value).ok())
            .map_or(-1, |at| at.timestamp());

        let options = &exchange.options;
        let prefix = if options.include_headers {
            format!("{}\r\n\r\n", header_lines.join("\r\n"))
        } else {
            String::new()
        };
        let fetch_body = !options.no_body && *exchange.wire_method() != Method::Head;

        let mut download_size: u64 = 0;
        let body = match sink {
            Some(sink) => {
                sink.write_all(prefix.as_bytes())
                    .map_err(|e| transport_failure_from_io(&e, TRANSPORT_CODE_WRITE_ERROR))?;
                if fetch_body {
                    download_size = io::copy(&mut response, sink)
                        .map_err(|e| transport_failure_from_io(&e, TRANSPORT_CODE_WRITE_ERROR))?;
                }
                sink.flush()
                    .map_err(|e| transport_failure_from_io(&e, TRANSPORT_CODE_WRITE_ERROR))?;
                None
            }
            None => {
                let mut bytes = prefix.into_bytes();
                if fetch_body {
                    download_size = response
                        .read_to_end(&mut bytes)
                        .map_err(|e| transport_failure_from_io(&e, TRANSPORT_CODE_RECV_ERROR))?
                        as u64;
                }
                Some(bytes)
            }
        };

        let total = started.elapsed();
        let download_size = i64::try_from(download_size).unwrap_or(i64::MAX);
        let download_speed = if total.as_secs_f64() > 0.0 {
            (download_size as f64 / total.as_secs_f64()) as i64
        } else {
            0
        };

        let verbose = exchange
            .verbose
            .then(|| verbose_trace(exchange, &header_lines, total));

        Ok(Reply {
            effective_url: effective_url.to_string(),
            status_code: status.as_u16(),
            header_lines,
            body,
            redirect_url,
            timings: Timings::measured(start_transfer, total),
            download_size,
            download_speed,
            file_time,
            verbose,
        })
    }

    fn import_cookie(&mut self, record: &str) {
        if let Err(e) = self.jar.import_record(record) {
            debug!("Ignoring cookie record: {}", e);
        }
    }

    fn cookie_records(&self) -> Vec<String> {
        self.jar.records()
    }

    fn clear_cookies(&mut self) {
        self.jar.clear();
    }

    fn load_cookies(&mut self, path: &Path) -> io::Result<usize> {
        self.jar.load(path)
    }

    fn save_cookies(&self, path: &Path) -> io::Result<()> {
        self.jar.save(path)
    }
}

/// Renders a curl-style trace: `>` request lines, `<` response lines.
fn verbose_trace(exchange: &Exchange, response_lines: &[String], total: Duration) -> String {
    let mut trace = String::new();
    let _ = writeln!(trace, "> {} {}", exchange.wire_method(), exchange.url);
    for line in &exchange.header_lines {
        let _ = writeln!(trace, "> {}", line);
    }
    if let Some(payload) = &exchange.options.payload {
        let _ = writeln!(trace, "> [{} body]", payload.content_type());
    }
    for line in response_lines {
        let _ = writeln!(trace, "< {}", line);
    }
    let _ = writeln!(trace, "* completed in {:.3}s", total.as_secs_f64());
    trace
}
