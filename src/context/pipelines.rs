//! Method-keyed pipelines.
//!
//! A pipeline registered under a method transforms the bodies of requests sent
//! with that method. The `Default` key is the fallback used when no
//! method-specific pipeline exists.

use std::fmt;
use std::sync::Arc;

use crate::error_handling::PipeError;
use crate::http::Method;
use crate::pipeline::{CallbackPipe, JsonPipe, Pipe, PipeValue, Pipeline};
use crate::utils::OneOrMany;

use super::Context;

/// Key of a registered pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PipelineKey {
    /// Fallback for methods without their own pipeline
    Default,
    /// A specific method
    Method(Method),
}

impl fmt::Display for PipelineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineKey::Default => write!(f, "default"),
            PipelineKey::Method(method) => write!(f, "{}", method.as_str()),
        }
    }
}

impl From<Method> for PipelineKey {
    fn from(method: Method) -> Self {
        PipelineKey::Method(method)
    }
}

impl From<&Method> for PipelineKey {
    fn from(method: &Method) -> Self {
        PipelineKey::Method(method.clone())
    }
}

/// An empty token is the default key; anything else is parsed as a method.
impl From<&str> for PipelineKey {
    fn from(token: &str) -> Self {
        if token.trim().is_empty() {
            PipelineKey::Default
        } else {
            PipelineKey::Method(Method::parse(token))
        }
    }
}

impl From<Method> for OneOrMany<PipelineKey> {
    fn from(method: Method) -> Self {
        OneOrMany::One(method.into())
    }
}

impl From<&str> for OneOrMany<PipelineKey> {
    fn from(token: &str) -> Self {
        OneOrMany::One(token.into())
    }
}

impl From<Vec<Method>> for OneOrMany<PipelineKey> {
    fn from(methods: Vec<Method>) -> Self {
        OneOrMany::Many(methods.into_iter().map(PipelineKey::from).collect())
    }
}

impl<const N: usize> From<[Method; N]> for OneOrMany<PipelineKey> {
    fn from(methods: [Method; N]) -> Self {
        OneOrMany::Many(methods.into_iter().map(PipelineKey::from).collect())
    }
}

/// How a send turns the response body into its result.
#[derive(Debug, Clone, Default)]
pub enum PipelineChoice {
    /// Run the context pipeline registered for the request method
    #[default]
    Context,
    /// Return the body untouched
    Raw,
    /// Run this pipeline instead of the context's
    Custom(Pipeline),
}

impl Context {
    /// Registered pipelines by key.
    pub fn pipelines(&self) -> impl Iterator<Item = (&PipelineKey, &Pipeline)> {
        self.pipelines.iter()
    }

    /// Registers `pipeline` under every key; `None` removes the keys instead.
    pub fn set_pipeline(
        &mut self,
        pipeline: Option<Pipeline>,
        keys: impl Into<OneOrMany<PipelineKey>>,
    ) {
        for key in keys.into() {
            match &pipeline {
                Some(pipeline) => {
                    self.pipelines.insert(key, pipeline.clone());
                }
                None => {
                    self.pipelines.remove(&key);
                }
            }
        }
    }

    /// Appends a pipe to the pipeline of every key, creating missing pipelines.
    pub fn add_pipe(&mut self, pipe: Arc<dyn Pipe>, keys: impl Into<OneOrMany<PipelineKey>>) {
        for key in keys.into() {
            self.pipelines.entry(key).or_default().add(Arc::clone(&pipe));
        }
    }

    /// Appends a JSON-decoding pipe for the payload-carrying methods.
    pub fn add_json_pipe(&mut self) {
        self.add_json_pipe_to(Method::with_payload());
    }

    /// Appends a JSON-decoding pipe under the given keys.
    pub fn add_json_pipe_to(&mut self, keys: impl Into<OneOrMany<PipelineKey>>) {
        self.add_pipe(Arc::new(JsonPipe), keys);
    }

    /// Appends a callback pipe for the payload-carrying methods.
    pub fn add_callback_pipe<F>(&mut self, callback: F)
    where
        F: Fn(PipeValue) -> PipeValue + Send + Sync + 'static,
    {
        self.add_callback_pipe_to(callback, Method::with_payload());
    }

    /// Appends a callback pipe under the given keys.
    pub fn add_callback_pipe_to<F>(&mut self, callback: F, keys: impl Into<OneOrMany<PipelineKey>>)
    where
        F: Fn(PipeValue) -> PipeValue + Send + Sync + 'static,
    {
        self.add_pipe(Arc::new(CallbackPipe::new(callback)), keys);
    }

    /// Removes every pipeline.
    pub fn clear_pipelines(&mut self) {
        self.pipelines.clear();
    }

    /// The pipeline for `key`, falling back to the default pipeline.
    pub fn get_pipeline(&self, key: impl Into<PipelineKey>) -> Option<&Pipeline> {
        self.pipelines
            .get(&key.into())
            .or_else(|| self.pipelines.get(&PipelineKey::Default))
    }

    /// Runs `value` through the pipeline for `key`.
    ///
    /// The value passes through unchanged when pipelines are disabled, when none
    /// is registered for the key, or when the pipeline is inactive.
    ///
    /// # Errors
    ///
    /// Returns the first hard failure reported by a pipe.
    pub fn perform_pipeline(
        &self,
        value: PipeValue,
        key: impl Into<PipelineKey>,
    ) -> Result<PipeValue, PipeError> {
        if !self.pipelines_active {
            return Ok(value);
        }
        match self.get_pipeline(key) {
            Some(pipeline) => pipeline.perform(value),
            None => Ok(value),
        }
    }

    /// Whether pipelines run on send.
    pub fn is_pipelines_active(&self) -> bool {
        self.pipelines_active
    }

    /// Turns pipeline processing on or off globally.
    pub fn set_pipelines_active(&mut self, active: bool) {
        self.pipelines_active = active;
    }

    /// Turns pipeline processing on.
    pub fn enable_pipelines(&mut self) {
        self.pipelines_active = true;
    }

    /// Turns pipeline processing off.
    pub fn disable_pipelines(&mut self) {
        self.pipelines_active = false;
    }
}
