//! URL composition and normalization against the context identity.

use crate::urls::{
    encode_unsafe, has_trailing_slash, normalize_path, remove_last_segment, Query, UrlParts,
};

use super::Context;

/// Per-call overrides for `Context::compose_url_with`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlOverrides<'a> {
    /// Path; `None` uses the context's default path
    pub path: Option<&'a str>,
    /// Query merged over the context's default query
    pub query: Option<&'a Query>,
    /// Subdomain instead of the context's own
    pub subdomain: Option<&'a str>,
    /// Scheme choice instead of the context's own
    pub secured: Option<bool>,
    /// Domain instead of the context's own
    pub domain: Option<&'a str>,
}

impl Context {
    /// Builds an absolute URL from the context defaults.
    ///
    /// Shorthand for `compose_url_with` with only a path and query.
    pub fn compose_url(&self, path: Option<&str>, query: Option<&Query>) -> String {
        self.compose_url_with(UrlOverrides {
            path,
            query,
            ..Default::default()
        })
    }

    /// Builds an absolute URL, overriding context defaults per argument.
    ///
    /// The caller path loses its leading slashes; exactly one slash separates it
    /// from the host. A non-empty query is merged over the default query, with
    /// the caller's values winning.
    pub fn compose_url_with(&self, overrides: UrlOverrides<'_>) -> String {
        let domain = overrides
            .domain
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.domain);
        let subdomain = overrides
            .subdomain
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .or(self.subdomain.as_deref());
        let host = match subdomain {
            Some(subdomain) => format!("{}.{}", subdomain, domain),
            None => domain.to_string(),
        };

        let mut path = match overrides.path {
            Some(path) => path.trim().trim_start_matches('/').to_string(),
            None => self.path.clone().unwrap_or_default(),
        };
        if let Some(query) = overrides.query.filter(|q| !q.is_empty()) {
            let merged = match &self.query {
                Some(base) => base.clone().merged(query),
                None => query.clone(),
            };
            path.push('?');
            path.push_str(&merged.encode());
        }

        let secured = overrides.secured.unwrap_or(self.secured);
        format!(
            "{}://{}/{}",
            if secured { "https" } else { "http" },
            host,
            path
        )
    }

    /// Rewrites a caller-typed URL into one consistent with the context.
    ///
    /// Uses the context's URL-encoding setting; see `normalize_url_with`.
    pub fn normalize_url(&self, url: &str, query: Option<&Query>) -> String {
        self.normalize_url_with(url, query, None)
    }

    /// Rewrites a caller-typed URL into one consistent with the context.
    ///
    /// A URL whose host does not end with the context host is foreign: it is
    /// returned with only its scheme replaced. Otherwise the path is resolved
    /// against the default path, queries are merged in the order
    /// default ← `query` ← URL literal (later values win, keys keep their first
    /// position), and the scheme and host are replaced by the context's.
    ///
    /// # Arguments
    ///
    /// * `url` - Relative or absolute URL as typed
    /// * `query` - Extra query parameters
    /// * `encode` - Percent-encode unsafe characters first; `None` uses the context setting
    pub fn normalize_url_with(&self, url: &str, query: Option<&Query>, encode: Option<bool>) -> String {
        let url = url.trim();
        let encode = encode.unwrap_or(self.encode_urls);
        let raw = if encode {
            encode_unsafe(url)
        } else {
            url.to_string()
        };
        let mut parts = UrlParts::parse(&raw);

        if let Some(host) = parts.authority_host() {
            if !host
                .to_ascii_lowercase()
                .ends_with(&self.host().to_ascii_lowercase())
            {
                parts.scheme = Some(self.scheme().to_string());
                return parts.compose();
            }
        }

        match parts.path.as_deref() {
            Some(path) => {
                let normalized = self.resolve_path(path, has_trailing_slash(path), encode);
                parts.path = Some(normalized);
            }
            None => parts.path = self.default_path(encode),
        }

        let layered = match (&self.query, query) {
            (Some(base), Some(query)) => Some(base.clone().merged(query)),
            (Some(base), None) => Some(base.clone()),
            (None, Some(query)) => Some(query.clone()),
            (None, None) => None,
        };
        if let Some(mut merged) = layered {
            if let Some(literal) = parts.query.as_deref() {
                merged.merge(&Query::parse(literal));
            }
            parts.query = Some(merged.encode()).filter(|q| !q.is_empty());
        }

        parts.scheme = Some(self.scheme().to_string());
        parts.host = Some(self.host());
        parts.port = None;
        parts.compose()
    }

    /// Resolves `path` against the default path.
    ///
    /// With strict path handling the default path's last segment is dropped
    /// first, so it behaves like a directory. Paths starting with `/` ignore the
    /// default path.
    pub fn normalize_path(&self, path: &str, trailing_slash: bool) -> String {
        self.resolve_path(path, trailing_slash, self.encode_urls)
    }

    fn resolve_path(&self, path: &str, trailing_slash: bool, encode: bool) -> String {
        let base = self.default_path(encode);
        let base = if self.strict_path_handling {
            base.as_deref().map(remove_last_segment)
        } else {
            base
        };
        normalize_path(path, base.as_deref(), trailing_slash)
    }

    /// The default path, percent-encoded like caller input when `encode` is set.
    fn default_path(&self, encode: bool) -> Option<String> {
        self.path
            .as_deref()
            .map(|path| if encode { encode_unsafe(path) } else { path.to_string() })
    }
}
