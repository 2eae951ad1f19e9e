//! Ordered query mapping.
//!
//! Keys keep their first insertion position; re-inserting a key replaces its
//! value in place. This gives the layered merge order used by normalization:
//! a later layer's value wins while key order follows first appearance.

use url::form_urlencoded;

use crate::utils::OneOrMany;

/// A query value: one string or a list (`key[]=a&key[]=b`).
pub type QueryValue = OneOrMany<String>;

/// An ordered key → value query mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, QueryValue)>,
}

impl Query {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw query string (without the leading `?`).
    ///
    /// `key[]` entries are collected into a list under `key`; other repeated
    /// keys keep the last value.
    pub fn parse(raw: &str) -> Query {
        let mut query = Query::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.strip_suffix("[]") {
                Some(list_key) => query.push_to_list(list_key, value.into_owned()),
                None => query.insert(key.into_owned(), value.into_owned()),
            }
        }
        query
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` when the query has no keys.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Looks up a key.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sets a key, replacing an existing value in place or appending a new key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Removes a key.
    pub fn remove(&mut self, key: &str) -> Option<QueryValue> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    /// Merges `other` over `self`: values from `other` win, new keys are appended.
    pub fn merge(&mut self, other: &Query) {
        for (key, value) in &other.pairs {
            self.insert(key.clone(), value.clone());
        }
    }

    /// Returns `self` merged with `other`.
    pub fn merged(mut self, other: &Query) -> Query {
        self.merge(other);
        self
    }

    /// Encodes the query for use in a URL (`a=1&list[]=x&list[]=y`).
    pub fn encode(&self) -> String {
        self.serialize("[]")
    }

    /// Encodes the query as an `application/x-www-form-urlencoded` body.
    ///
    /// Same as `encode` except list brackets are escaped (`list%5B%5D=x`).
    pub fn to_form_body(&self) -> String {
        self.serialize("%5B%5D")
    }

    /// Flattens lists into indexed keys (`list[0]`, `list[1]`) for multipart bodies.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut fields = Vec::new();
        for (key, value) in &self.pairs {
            match value {
                OneOrMany::One(v) => fields.push((key.clone(), v.clone())),
                OneOrMany::Many(values) => {
                    for (i, v) in values.iter().enumerate() {
                        fields.push((format!("{}[{}]", key, i), v.clone()));
                    }
                }
            }
        }
        fields
    }

    fn push_to_list(&mut self, key: &str, value: String) {
        match self.pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, OneOrMany::Many(values))) => values.push(value),
            Some((_, existing)) => *existing = OneOrMany::Many(vec![value]),
            None => self
                .pairs
                .push((key.to_string(), OneOrMany::Many(vec![value]))),
        }
    }

    fn serialize(&self, list_suffix: &str) -> String {
        let mut parts = Vec::new();
        for (key, value) in &self.pairs {
            let key = encode_component(key);
            match value {
                OneOrMany::One(v) => parts.push(format!("{}={}", key, encode_component(v))),
                OneOrMany::Many(values) => {
                    for v in values {
                        parts.push(format!("{}{}={}", key, list_suffix, encode_component(v)));
                    }
                }
            }
        }
        parts.join("&")
    }
}

fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Query::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
