//! Pipe trait and built-in pipes.

use std::fmt;

use crate::error_handling::PipeError;

use super::PipeValue;

/// A single value transform.
pub trait Pipe: Send + Sync {
    /// Transforms `value`.
    ///
    /// # Errors
    ///
    /// Only for hard failures; input a pipe cannot handle yields `PipeValue::Empty`.
    fn transform(&self, value: PipeValue) -> Result<PipeValue, PipeError>;
}

/// Decodes JSON text into a structured value.
///
/// Malformed JSON and non-text input yield `PipeValue::Empty`; structured input
/// passes through.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPipe;

impl Pipe for JsonPipe {
    fn transform(&self, value: PipeValue) -> Result<PipeValue, PipeError> {
        Ok(match value {
            PipeValue::Text(text) => serde_json::from_str(&text)
                .map(PipeValue::Structured)
                .unwrap_or(PipeValue::Empty),
            structured @ PipeValue::Structured(_) => structured,
            PipeValue::Empty => PipeValue::Empty,
        })
    }
}

type Callback = Box<dyn Fn(PipeValue) -> Result<PipeValue, PipeError> + Send + Sync>;

/// Runs a caller-supplied function.
pub struct CallbackPipe {
    callback: Option<Callback>,
}

impl CallbackPipe {
    /// Wraps an infallible transform.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(PipeValue) -> PipeValue + Send + Sync + 'static,
    {
        Self {
            callback: Some(Box::new(move |value| Ok(callback(value)))),
        }
    }

    /// Wraps a transform that may fail hard.
    pub fn fallible<F>(callback: F) -> Self
    where
        F: Fn(PipeValue) -> Result<PipeValue, PipeError> + Send + Sync + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// A pipe with no callback; it always yields `PipeValue::Empty`.
    pub fn empty() -> Self {
        Self { callback: None }
    }

    /// Returns `true` if a callback is set.
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl fmt::Debug for CallbackPipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackPipe")
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl Pipe for CallbackPipe {
    fn transform(&self, value: PipeValue) -> Result<PipeValue, PipeError> {
        match &self.callback {
            Some(callback) => callback(value),
            None => Ok(PipeValue::Empty),
        }
    }
}
