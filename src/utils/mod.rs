//! Small shared helpers.
//!
//! This module provides:
//! - `OneOrMany`, the "single value or ordered sequence" parameter type
//! - `clarify`, the trim-and-drop-empty normalization applied by setters

/// A single value or an ordered sequence of values.
///
/// Used wherever a caller may pass either one item or a list (header values,
/// pipeline keys, extraction results).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<T> {
    /// Exactly one value
    One(T),
    /// An ordered sequence of values
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Returns the values as a vector, preserving order.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }

    /// Iterates over the values in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value).iter(),
            OneOrMany::Many(values) => values.iter(),
        }
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        match self {
            OneOrMany::One(_) => 1,
            OneOrMany::Many(values) => values.len(),
        }
    }

    /// Returns `true` for an empty `Many`.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the single value, if this is `One`.
    pub fn as_one(&self) -> Option<&T> {
        match self {
            OneOrMany::One(value) => Some(value),
            OneOrMany::Many(_) => None,
        }
    }

    /// Returns the first value in order.
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        OneOrMany::One(value)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(values: Vec<T>) -> Self {
        OneOrMany::Many(values)
    }
}

impl From<&str> for OneOrMany<String> {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany<String> {
    fn from(values: Vec<&str>) -> Self {
        OneOrMany::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OneOrMany<String> {
    fn from(values: [&str; N]) -> Self {
        OneOrMany::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<T> IntoIterator for OneOrMany<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

/// Trims `value` and drops it when nothing is left.
///
/// # Arguments
///
/// * `value` - Raw caller input
///
/// # Returns
///
/// The trimmed string, or `None` when the input is absent or blank.
pub fn clarify(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
