//! Redirect chain tracking.
//!
//! This module decides, after each exchange, whether the context follows a
//! redirect, stops, or fails. It resolves relative locations against the URL
//! just fetched, lets hooks veto or rewrite each hop, and detects loops and
//! limit overflows.

use log::{debug, warn};

use crate::error_handling::{CrawlerError, RedirectFailure};
use crate::urls::{canonical_url, complete_url};

use super::{CrawlerHooks, RedirectEvent, Response};

/// What to do after an exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectStep {
    /// The response is final
    Terminal,
    /// Fetch this absolute URL next
    Follow(String),
    /// A hook declined the hop; the redirect response is final
    Vetoed,
}

/// State of one redirect chain.
#[derive(Debug, Clone, Default)]
pub struct RedirectTracker {
    limit: Option<usize>,
    locations: Vec<String>,
    count: usize,
}

impl RedirectTracker {
    /// Starts a chain allowing at most `limit` hops (`None` = unlimited).
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            locations: Vec::new(),
            count: 0,
        }
    }

    /// URLs fetched so far in canonical form, in order.
    pub fn chain(&self) -> &[String] {
        &self.locations
    }

    /// Hops followed so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Decides the next step after `response` was received for `current_url`.
    ///
    /// # Arguments
    ///
    /// * `response` - The response just received
    /// * `current_url` - The URL that produced it
    /// * `hooks` - Receives a `RedirectEvent` for every hop
    ///
    /// # Returns
    ///
    /// `Terminal` for a non-redirect (or a redirect without a location),
    /// `Vetoed` when a hook ignored the hop, otherwise `Follow` with the
    /// absolute (possibly rewritten) target.
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::LoopedRedirect` when the target was already
    /// fetched in this chain, and `CrawlerError::RedirectOverflow` when the
    /// hop count exceeds the limit.
    pub fn advance(
        &mut self,
        response: &Response,
        current_url: &str,
        hooks: &mut dyn CrawlerHooks,
    ) -> Result<RedirectStep, CrawlerError> {
        if !response.is_redirect() {
            return Ok(RedirectStep::Terminal);
        }
        self.locations.push(canonical_url(current_url));

        let Some(target) = response.redirect_url() else {
            warn!(
                "Redirect status {} for {} but no Location header",
                response.status_code(),
                current_url
            );
            return Ok(RedirectStep::Terminal);
        };

        self.count += 1;
        let mut event = RedirectEvent::new(
            complete_url(target, current_url),
            response.status_code(),
            self.count,
        );
        hooks.on_redirect(&mut event);
        if event.is_ignored() {
            debug!("Redirect {} -> {} vetoed", current_url, event.location());
            return Ok(RedirectStep::Vetoed);
        }
        let location = event.into_location();

        if self.locations.contains(&canonical_url(&location)) {
            return Err(CrawlerError::LoopedRedirect(
                self.failure(location, response.status_code()),
            ));
        }
        if self.limit.is_some_and(|limit| self.count > limit) {
            return Err(CrawlerError::RedirectOverflow(
                self.failure(location, response.status_code()),
            ));
        }

        debug!(
            "Following redirect #{} ({}) {} -> {}",
            self.count,
            response.status_code(),
            current_url,
            location
        );
        Ok(RedirectStep::Follow(location))
    }

    fn failure(&self, location: String, status_code: u16) -> RedirectFailure {
        RedirectFailure {
            chain: self.locations.clone(),
            location,
            status_code,
            count: self.count,
        }
    }
}
