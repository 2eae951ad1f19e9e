//! Lenient URL component split.
//!
//! Unlike `url::Url`, this accepts relative references (`foo?x=1`, `//host/p`,
//! `#frag`) and never rewrites what it does not understand, which is what
//! normalization of caller-typed URLs needs.

/// The components of a possibly-relative URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Lowercased scheme (`https`)
    pub scheme: Option<String>,
    /// User name from the authority
    pub user: Option<String>,
    /// Password from the authority
    pub pass: Option<String>,
    /// Host name (IPv6 hosts keep their brackets)
    pub host: Option<String>,
    /// Port number
    pub port: Option<u16>,
    /// Path, as written
    pub path: Option<String>,
    /// Query string without the `?`
    pub query: Option<String>,
    /// Fragment without the `#`
    pub fragment: Option<String>,
}

impl UrlParts {
    /// Splits `input` into components.
    ///
    /// Empty components are reported as `None`.
    pub fn parse(input: &str) -> UrlParts {
        let mut parts = UrlParts::default();
        let mut rest = input;

        if let Some((before, fragment)) = rest.split_once('#') {
            parts.fragment = non_empty(fragment);
            rest = before;
        }
        if let Some((before, query)) = rest.split_once('?') {
            parts.query = non_empty(query);
            rest = before;
        }
        if let Some(idx) = rest.find("://") {
            let scheme = &rest[..idx];
            if is_scheme(scheme) {
                parts.scheme = Some(scheme.to_ascii_lowercase());
                rest = &rest[idx + 1..];
            }
        }
        if let Some(after) = rest.strip_prefix("//") {
            let (authority, path) = match after.find('/') {
                Some(i) => after.split_at(i),
                None => (after, ""),
            };
            parts.parse_authority(authority);
            rest = path;
        }
        parts.path = non_empty(rest);
        parts
    }

    /// Host and port as they appear in an authority (`example.org:8080`).
    pub fn authority_host(&self) -> Option<String> {
        let host = self.host.as_ref()?;
        Some(match self.port {
            Some(port) => format!("{}:{}", host, port),
            None => host.clone(),
        })
    }

    /// Reassembles the components into a URL string.
    ///
    /// When a host is present the path always starts with a slash, and an
    /// empty path becomes `/`.
    pub fn compose(&self) -> String {
        let mut out = String::new();
        if let Some(scheme) = &self.scheme {
            out.push_str(scheme);
            out.push(':');
        }
        if let Some(host) = &self.host {
            out.push_str("//");
            if let Some(user) = &self.user {
                out.push_str(user);
                if let Some(pass) = &self.pass {
                    out.push(':');
                    out.push_str(pass);
                }
                out.push('@');
            }
            out.push_str(host);
            if let Some(port) = self.port {
                out.push(':');
                out.push_str(&port.to_string());
            }
        }
        match self.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => {
                if self.host.is_some() && !path.starts_with('/') {
                    out.push('/');
                }
                out.push_str(path);
            }
            None if self.host.is_some() => out.push('/'),
            None => {}
        }
        if let Some(query) = self.query.as_deref().filter(|q| !q.is_empty()) {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = self.fragment.as_deref().filter(|f| !f.is_empty()) {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }

    fn parse_authority(&mut self, authority: &str) {
        let host_port = match authority.rsplit_once('@') {
            Some((userinfo, host_port)) => {
                match userinfo.split_once(':') {
                    Some((user, pass)) => {
                        self.user = non_empty(user);
                        self.pass = Some(pass.to_string());
                    }
                    None => self.user = non_empty(userinfo),
                }
                host_port
            }
            None => authority,
        };

        let port_split = if host_port.starts_with('[') {
            host_port
                .find(']')
                .and_then(|end| host_port[end + 1..].strip_prefix(':').map(|p| (end + 1, p)))
        } else {
            host_port.rsplit_once(':').map(|(h, p)| (h.len(), p))
        };
        match port_split {
            Some((host_end, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => {
                self.host = non_empty(&host_port[..host_end]);
                self.port = port.parse().ok();
            }
            Some((host_end, "")) => self.host = non_empty(&host_port[..host_end]),
            _ => self.host = non_empty(host_port),
        }
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
