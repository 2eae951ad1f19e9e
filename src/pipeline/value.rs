//! Values carried through pipelines.

/// A value produced by a response or a pipe.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PipeValue {
    /// No value: an empty body, or a pipe that could not handle its input
    #[default]
    Empty,
    /// Raw text (response bodies start here)
    Text(String),
    /// Structured data, e.g. decoded JSON
    Structured(serde_json::Value),
}

impl PipeValue {
    /// Returns `true` for `Empty`.
    pub fn is_empty(&self) -> bool {
        matches!(self, PipeValue::Empty)
    }

    /// The text, if this is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PipeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The structured value, if this is `Structured`.
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            PipeValue::Structured(value) => Some(value),
            _ => None,
        }
    }

    /// Consumes the value, returning the text if this is `Text`.
    pub fn into_text(self) -> Option<String> {
        match self {
            PipeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Consumes the value, returning the structured value if this is `Structured`.
    pub fn into_structured(self) -> Option<serde_json::Value> {
        match self {
            PipeValue::Structured(value) => Some(value),
            _ => None,
        }
    }
}

impl From<String> for PipeValue {
    fn from(text: String) -> Self {
        PipeValue::Text(text)
    }
}

impl From<&str> for PipeValue {
    fn from(text: &str) -> Self {
        PipeValue::Text(text.to_string())
    }
}

impl From<Option<String>> for PipeValue {
    fn from(text: Option<String>) -> Self {
        text.map_or(PipeValue::Empty, PipeValue::Text)
    }
}

impl From<serde_json::Value> for PipeValue {
    fn from(value: serde_json::Value) -> Self {
        PipeValue::Structured(value)
    }
}
