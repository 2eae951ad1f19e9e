//! Request creation and the exchange loop.

use std::ops::{Deref, DerefMut};

use log::{debug, trace};

use crate::error_handling::CrawlerError;
use crate::fetch::{
    BodySink, Exchange, RedirectStep, RedirectTracker, Request, RequestEvent, Response,
};
use crate::pipeline::PipeValue;
use crate::urls::Query;

use super::{Context, PipelineChoice};

/// A request bound to the context that created it.
///
/// Dereferences to `Request`, so every transition and setter is available
/// before `send` consumes it.
pub struct BoundRequest<'c> {
    context: &'c mut Context,
    request: Request,
}

impl<'c> BoundRequest<'c> {
    /// The owning context.
    pub fn context(&self) -> &Context {
        self.context
    }

    /// Sends the request, running the context pipeline for its method.
    ///
    /// # Errors
    ///
    /// See `Context::send_request`.
    pub fn send(self) -> Result<Option<PipeValue>, CrawlerError> {
        self.send_with(PipelineChoice::Context)
    }

    /// Sends the request with an explicit pipeline choice.
    ///
    /// # Errors
    ///
    /// See `Context::send_request`.
    pub fn send_with(self, choice: PipelineChoice) -> Result<Option<PipeValue>, CrawlerError> {
        let BoundRequest { context, request } = self;
        context.send_request(request, choice)
    }

    /// Detaches the request from the context.
    pub fn into_request(self) -> Request {
        self.request
    }
}

impl Deref for BoundRequest<'_> {
    type Target = Request;

    fn deref(&self) -> &Request {
        &self.request
    }
}

impl DerefMut for BoundRequest<'_> {
    fn deref_mut(&mut self) -> &mut Request {
        &mut self.request
    }
}

impl Context {
    /// Creates a GET request carrying copies of the context options and headers.
    ///
    /// # Arguments
    ///
    /// * `url` - Relative or absolute URL, normalized at send time
    /// * `query` - Query merged during normalization
    /// * `referer` - Overrides the referer option
    pub fn request(&self, url: &str, query: Option<Query>, referer: Option<&str>) -> Request {
        let mut request = Request::with_parts(url, self.options.clone(), self.headers.clone());
        request
            .set_default_data_type(self.default_data_type.clone())
            .set_query(query);
        if referer.is_some() {
            request.options_mut().set_referer(referer);
        }
        request
    }

    /// Creates a request bound to this context; see `request`.
    pub fn new_request(
        &mut self,
        url: &str,
        query: Option<Query>,
        referer: Option<&str>,
    ) -> BoundRequest<'_> {
        let request = self.request(url, query, referer);
        BoundRequest {
            context: self,
            request,
        }
    }

    /// Sends a request and returns its body after the chosen pipeline ran.
    ///
    /// The URL is normalized unless the request carries a direct URL. The
    /// request hook may veto the call or rewrite the URL. Redirects are
    /// followed according to the context policy, with every response kept in
    /// the history.
    ///
    /// # Returns
    ///
    /// `None` when the request hook vetoed the call, otherwise the pipeline output
    /// (`PipeValue::Empty` for an empty body).
    ///
    /// # Errors
    ///
    /// Returns transport, timeout and redirect errors from the exchange loop, and
    /// `CrawlerError::Pipeline` when a pipe fails hard. An HTTP error status is
    /// not an error.
    pub fn send_request(
        &mut self,
        mut request: Request,
        choice: PipelineChoice,
    ) -> Result<Option<PipeValue>, CrawlerError> {
        let url = match &request.options().direct_url {
            Some(url) => url.clone(),
            None => self.normalize_url(request.url(), request.query()),
        };

        let mut event = RequestEvent::new(&request, url);
        self.hooks.on_request(&mut event);
        if event.is_ignored() {
            debug!("Request to {} vetoed", event.effective_url());
            return Ok(None);
        }
        let url = event.into_effective_url();

        if !self.persist_verbose_output {
            self.verbose_output.clear();
        }

        let mut sink = request.take_sink();
        let result = self.run_exchanges(&request, url, &mut sink);
        drop(sink);
        if !self.persist_transport {
            self.close();
        }
        result?;

        let value = match self.responses.last().and_then(Response::content) {
            Some(content) if !content.is_empty() => PipeValue::Text(content.to_string()),
            _ => PipeValue::Empty,
        };
        let value = match choice {
            PipelineChoice::Raw => value,
            PipelineChoice::Custom(pipeline) => pipeline.perform(value)?,
            PipelineChoice::Context => self.perform_pipeline(value, request.method())?,
        };
        Ok(Some(value))
    }

    fn run_exchanges(
        &mut self,
        request: &Request,
        url: String,
        sink: &mut Option<Box<dyn BodySink>>,
    ) -> Result<(), CrawlerError> {
        self.responses.clear();

        if !self.redirects_allowed || request.options().follow_redirects {
            let response = self.execute(request, &url, sink_mut(sink))?;
            self.responses.push(response);
            return Ok(());
        }

        let mut tracker = RedirectTracker::new(self.redirects_limit);
        let mut current = url;
        loop {
            let response = self.execute(request, &current, sink_mut(sink))?;
            self.responses.push(response);

            let step = match self.responses.last() {
                Some(response) => {
                    let fetched = response.url().unwrap_or(current.as_str()).to_string();
                    tracker.advance(response, &fetched, self.hooks.as_mut())?
                }
                None => RedirectStep::Terminal,
            };
            match step {
                RedirectStep::Follow(location) => {
                    if let Some(sink) = sink.as_mut() {
                        sink.truncate()?;
                    }
                    current = location;
                }
                RedirectStep::Terminal | RedirectStep::Vetoed => return Ok(()),
            }
        }
    }

    fn execute(
        &mut self,
        request: &Request,
        url: &str,
        sink: Option<&mut dyn BodySink>,
    ) -> Result<Response, CrawlerError> {
        self.initialize()?;
        self.flush_cookies();

        let exchange = Exchange {
            url: url.to_string(),
            method: request.method().clone(),
            header_lines: request.headers().to_lines(true),
            options: request.options().clone(),
            verbose: self.verbose,
        };
        debug!("{} {}", exchange.wire_method().as_str(), url);

        let mut reply = self
            .transport_mut()?
            .exchange(&exchange, sink)
            .map_err(|failure| CrawlerError::from_transport(url, failure))?;

        if let Some(output) = reply.verbose.take() {
            trace!("{}", output);
            self.verbose_output.push_str(&output);
        }
        Ok(Response::from_reply(reply))
    }
}

fn sink_mut(sink: &mut Option<Box<dyn BodySink>>) -> Option<&mut dyn BodySink> {
    let sink: &mut dyn BodySink = sink.as_mut()?.as_mut();
    Some(sink)
}
