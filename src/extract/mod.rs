//! Regex content extraction.
//!
//! An `Extractor` runs regular expressions over a document (usually a response
//! body) and returns the captured text. Results follow one rule:
//! - with an explicit group, that group alone
//! - a pattern without groups yields the whole match
//! - a pattern with one group yields that group
//! - a pattern with several groups yields all of them, in order
//!
//! In strict mode a miss is an `ExtractorError` carrying the pattern, URL and
//! content; otherwise it is `None` (or an empty list).

use log::debug;
use regex::{Captures, Regex};

use crate::error_handling::ExtractorError;
use crate::fetch::Response;
use crate::utils::OneOrMany;

/// Inline flags accepted by `Extractor` patterns.
const SUPPORTED_FLAGS: &str = "imsUx";

/// A capture group selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Group {
    /// Group by position; `0` is the whole match
    Index(usize),
    /// Named group
    Name(String),
}

impl From<usize> for Group {
    fn from(index: usize) -> Self {
        Group::Index(index)
    }
}

impl From<&str> for Group {
    fn from(name: &str) -> Self {
        Group::Name(name.to_string())
    }
}

/// Captured text: a single value or every group of a multi-group pattern.
pub type Extracted = OneOrMany<String>;

/// Regex extraction over one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extractor {
    url: Option<String>,
    content: String,
}

impl Extractor {
    /// Creates an extractor over `content`.
    pub fn new(content: &str, url: Option<&str>) -> Self {
        Self {
            url: url.map(str::to_string),
            content: content.to_string(),
        }
    }

    /// Creates an extractor over a response body.
    pub fn from_response(response: &Response) -> Self {
        Self::new(response.content().unwrap_or(""), response.url())
    }

    /// URL of the document, used in errors.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Sets the document URL.
    pub fn set_url(&mut self, url: Option<&str>) {
        self.url = url.map(str::to_string);
    }

    /// The document.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replaces the document, and its URL when one is given.
    pub fn set_content(&mut self, content: &str, url: Option<&str>) {
        self.content = content.to_string();
        if url.is_some() {
            self.set_url(url);
        }
    }

    /// Extracts the first match of `pattern`.
    ///
    /// # Arguments
    ///
    /// * `pattern` - Regular expression
    /// * `group` - Return only this group
    /// * `strict` - Fail instead of returning `None` on a miss
    /// * `flags` - Inline flags (`i`, `m`, `s`, `U`, `x`)
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError` for an invalid pattern, and for a miss in strict mode.
    pub fn extract(
        &self,
        pattern: &str,
        group: Option<Group>,
        strict: bool,
        flags: Option<&str>,
    ) -> Result<Option<Extracted>, ExtractorError> {
        let regex = self.compile(pattern, flags)?;
        match regex.captures(&self.content) {
            Some(captures) => Ok(sieve(&regex, &captures, group.as_ref())),
            None if strict => Err(self.failure("Regexp extraction failed", regex.as_str())),
            None => Ok(None),
        }
    }

    /// Extracts every match of `pattern`, one entry per match.
    ///
    /// A group that does not exist yields `None` entries.
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError` for an invalid pattern, and when nothing matches in
    /// strict mode.
    pub fn extract_all(
        &self,
        pattern: &str,
        group: Option<Group>,
        strict: bool,
        flags: Option<&str>,
    ) -> Result<Vec<Option<Extracted>>, ExtractorError> {
        let regex = self.compile(pattern, flags)?;
        let results: Vec<Option<Extracted>> = regex
            .captures_iter(&self.content)
            .map(|captures| sieve(&regex, &captures, group.as_ref()))
            .collect();
        if results.is_empty() && strict {
            return Err(self.failure("Regexp extraction failed", regex.as_str()));
        }
        Ok(results)
    }

    /// Returns `true` if `pattern` matches.
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError` for an invalid pattern.
    pub fn check(&self, pattern: &str, flags: Option<&str>) -> Result<bool, ExtractorError> {
        Ok(self.compile(pattern, flags)?.is_match(&self.content))
    }

    /// Extracts a value and compares it with `expected`.
    ///
    /// A multi-group result compares its first group.
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError` for an invalid pattern, and for a miss in strict mode.
    pub fn equal(
        &self,
        pattern: &str,
        expected: &str,
        group: Option<Group>,
        case_sensitive: bool,
        strict: bool,
        flags: Option<&str>,
    ) -> Result<bool, ExtractorError> {
        let extracted = self.extract(pattern, group, strict, flags)?;
        let Some(value) = extracted.as_ref().and_then(OneOrMany::first) else {
            return Ok(false);
        };
        Ok(if case_sensitive {
            value == expected
        } else {
            value.to_lowercase() == expected.to_lowercase()
        })
    }

    /// Returns the document with every match of each pattern removed, in order.
    ///
    /// # Errors
    ///
    /// Returns `ExtractorError` for an invalid pattern.
    pub fn clean_out(
        &self,
        patterns: impl Into<OneOrMany<String>>,
        flags: Option<&str>,
    ) -> Result<String, ExtractorError> {
        let mut result = self.content.clone();
        for pattern in patterns.into() {
            let regex = self.compile(&pattern, flags)?;
            result = regex.replace_all(&result, "").into_owned();
        }
        Ok(result)
    }

    fn compile(&self, pattern: &str, flags: Option<&str>) -> Result<Regex, ExtractorError> {
        let flags: String = flags
            .unwrap_or("")
            .chars()
            .filter(|c| SUPPORTED_FLAGS.contains(*c))
            .collect();
        let expression = if flags.is_empty() {
            pattern.to_string()
        } else {
            format!("(?{}){}", flags, pattern)
        };
        Regex::new(&expression).map_err(|e| {
            debug!("Invalid extraction pattern {:?}: {}", expression, e);
            self.failure(&format!("Invalid expression: {}", e), &expression)
        })
    }

    fn failure(&self, message: &str, pattern: &str) -> ExtractorError {
        ExtractorError {
            message: message.to_string(),
            pattern: pattern.to_string(),
            url: self.url.clone(),
            content: Some(self.content.clone()),
        }
    }
}

fn sieve(regex: &Regex, captures: &Captures<'_>, group: Option<&Group>) -> Option<Extracted> {
    let text = |m: Option<regex::Match<'_>>| m.map(|m| m.as_str().to_string());
    match group {
        Some(Group::Index(index)) => text(captures.get(*index)).map(OneOrMany::One),
        Some(Group::Name(name)) => text(captures.name(name)).map(OneOrMany::One),
        None => match regex.captures_len() {
            1 => text(captures.get(0)).map(OneOrMany::One),
            2 => Some(OneOrMany::One(text(captures.get(1)).unwrap_or_default())),
            len => Some(OneOrMany::Many(
                (1..len)
                    .map(|i| text(captures.get(i)).unwrap_or_default())
                    .collect(),
            )),
        },
    }
}

#[cfg(test)]
mod tests;
