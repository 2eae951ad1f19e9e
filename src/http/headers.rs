//! Ordered, case-insensitive header multi-map.
//!
//! Names are stored lowercase in insertion order; each name maps to a list of
//! trimmed, non-empty values. Header lines are rendered in the same order they
//! were added.

use crate::config::{
    HEADER_AUTHORIZATION, HEADER_CONTENT_LENGTH, HEADER_CONTENT_TYPE, HEADER_LOCATION, HEADER_SET_COOKIE,
    HEADER_X_REQUESTED_WITH, XHR_VALUE,
};
use crate::utils::OneOrMany;

/// An ordered multi-map of lowercase header names to value lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, Vec<String>)>,
    auto_correct_names: bool,
}

impl Headers {
    /// Creates an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether spaces and underscores in names are rewritten to dashes.
    pub fn is_auto_correct_names(&self) -> bool {
        self.auto_correct_names
    }

    /// Enables or disables name auto-correction for subsequent operations.
    pub fn set_auto_correct_names(&mut self, auto_correct_names: bool) {
        self.auto_correct_names = auto_correct_names;
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no header is set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates `(name, values)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Returns `true` if the header is present.
    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// All values for a header.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|i| self.entries[i].1.as_slice())
    }

    /// The value at `index` for a header.
    pub fn get_at(&self, name: &str, index: usize) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.get(index))
            .map(String::as_str)
    }

    /// The first value for a header.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get_at(name, 0)
    }

    /// The last value for a header.
    pub fn last(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Returns `true` if the header holds `value` (compared after trimming).
    pub fn contains(&self, name: &str, value: &str) -> bool {
        let value = value.trim();
        self.get(name)
            .is_some_and(|values| values.iter().any(|v| v == value))
    }

    /// Renders `name: value` lines, one per value.
    ///
    /// # Arguments
    ///
    /// * `capitalize` - Render names as `Content-Type` instead of `content-type`
    pub fn to_lines(&self, capitalize: bool) -> Vec<String> {
        let mut lines = Vec::new();
        for (name, values) in &self.entries {
            let name = if capitalize {
                capitalize_name(name)
            } else {
                name.clone()
            };
            for value in values {
                lines.push(format!("{}: {}", name, value));
            }
        }
        lines
    }

    /// Appends values to a header, creating it if needed.
    ///
    /// Blank values are dropped; a call with no usable value is a no-op.
    pub fn add(&mut self, name: &str, value: impl Into<OneOrMany<String>>) {
        let Some(name) = self.normalize_name(name) else {
            return;
        };
        let values = trimmed_values(value.into());
        if values.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.extend(values),
            None => self.entries.push((name, values)),
        }
    }

    /// Parses and adds a raw `name: value` line.
    ///
    /// Lines without a colon are ignored.
    pub fn add_line(&mut self, line: &str) {
        if let Some((name, value)) = line.split_once(':') {
            self.add(name, value);
        }
    }

    /// Replaces all values of a header.
    ///
    /// Replacing with no usable value removes the header.
    pub fn replace(&mut self, name: &str, value: impl Into<OneOrMany<String>>) {
        let Some(name) = self.normalize_name(name) else {
            return;
        };
        let values = trimmed_values(value.into());
        let position = self.entries.iter().position(|(n, _)| *n == name);
        match (position, values.is_empty()) {
            (Some(i), true) => {
                self.entries.remove(i);
            }
            (Some(i), false) => self.entries[i].1 = values,
            (None, true) => {}
            (None, false) => self.entries.push((name, values)),
        }
    }

    /// Replaces the whole set with the given headers.
    pub fn set<I, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (String, V)>,
        V: Into<OneOrMany<String>>,
    {
        self.entries.clear();
        for (name, value) in headers {
            self.replace(&name, value);
        }
    }

    /// Removes a header.
    pub fn remove(&mut self, name: &str) {
        if let Some(i) = self.position(name) {
            self.entries.remove(i);
        }
    }

    /// Removes every header.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The last `Content-Length`, parsed.
    pub fn content_length(&self) -> Option<u64> {
        self.last(HEADER_CONTENT_LENGTH)
            .and_then(|v| v.trim().parse().ok())
    }

    /// The first `Content-Type`.
    pub fn content_type(&self) -> Option<&str> {
        self.first(HEADER_CONTENT_TYPE)
    }

    /// Sets `Content-Type`, replacing any previous value.
    pub fn set_content_type(&mut self, content_type: &str) {
        self.replace(HEADER_CONTENT_TYPE, content_type);
    }

    /// The last `Location`.
    pub fn location(&self) -> Option<&str> {
        self.last(HEADER_LOCATION)
    }

    /// All `Set-Cookie` values, in order.
    pub fn received_cookies(&self) -> &[String] {
        self.get(HEADER_SET_COOKIE).unwrap_or(&[])
    }

    /// Marks (or unmarks) the request as an AJAX call.
    pub fn set_xhr(&mut self, xhr: bool) {
        if xhr {
            self.replace(HEADER_X_REQUESTED_WITH, XHR_VALUE);
        } else {
            self.remove(HEADER_X_REQUESTED_WITH);
        }
    }

    /// Returns `true` if the AJAX marker is present.
    pub fn is_xhr(&self) -> bool {
        self.contains(HEADER_X_REQUESTED_WITH, XHR_VALUE)
    }

    /// Sets `Authorization: Bearer <token>`; an empty token removes the header.
    pub fn set_bearer_token(&mut self, token: &str) {
        let token = token.trim();
        if token.is_empty() {
            self.remove(HEADER_AUTHORIZATION);
        } else {
            self.replace(HEADER_AUTHORIZATION, format!("Bearer {}", token));
        }
    }

    /// The token of a `Bearer` authorization header.
    pub fn bearer_token(&self) -> Option<&str> {
        self.first(HEADER_AUTHORIZATION)
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = self.normalize_name(name)?;
        self.entries.iter().position(|(n, _)| *n == name)
    }

    fn normalize_name(&self, name: &str) -> Option<String> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        if self.auto_correct_names {
            Some(name.replace([' ', '_'], "-"))
        } else {
            Some(name)
        }
    }
}

fn trimmed_values(values: OneOrMany<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// `content-type` -> `Content-Type`
fn capitalize_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("-")
}
