//! Ordered pipe chains.

use std::fmt;
use std::sync::Arc;

use crate::error_handling::PipeError;

use super::{Pipe, PipeValue};

/// An ordered chain of pipes.
///
/// Pipes are shared (`Arc`), so the same pipe may sit in several pipelines and
/// cloning a pipeline is cheap.
#[derive(Clone)]
pub struct Pipeline {
    pipes: Vec<Arc<dyn Pipe>>,
    active: bool,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            pipes: Vec::new(),
            active: true,
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("pipes", &self.pipes.len())
            .field("active", &self.active)
            .finish()
    }
}

impl Pipeline {
    /// Creates an empty, active pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an active pipeline from pipes.
    pub fn with_pipes(pipes: Vec<Arc<dyn Pipe>>) -> Self {
        Self {
            pipes,
            active: true,
        }
    }

    /// The pipes, in order.
    pub fn pipes(&self) -> &[Arc<dyn Pipe>] {
        &self.pipes
    }

    /// Replaces all pipes.
    pub fn set_pipes(&mut self, pipes: Vec<Arc<dyn Pipe>>) {
        self.pipes = pipes;
    }

    /// Appends a shared pipe.
    pub fn add(&mut self, pipe: Arc<dyn Pipe>) {
        self.pipes.push(pipe);
    }

    /// Appends a pipe.
    pub fn push<P: Pipe + 'static>(&mut self, pipe: P) {
        self.pipes.push(Arc::new(pipe));
    }

    /// Removes every occurrence of a shared pipe.
    pub fn remove(&mut self, pipe: &Arc<dyn Pipe>) {
        self.pipes.retain(|p| !Arc::ptr_eq(p, pipe));
    }

    /// Removes the pipe at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Arc<dyn Pipe>> {
        if index < self.pipes.len() {
            Some(self.pipes.remove(index))
        } else {
            None
        }
    }

    /// Removes the last pipe.
    pub fn remove_last(&mut self) -> Option<Arc<dyn Pipe>> {
        self.pipes.pop()
    }

    /// Removes every pipe.
    pub fn clear(&mut self) {
        self.pipes.clear();
    }

    /// Number of pipes.
    pub fn len(&self) -> usize {
        self.pipes.len()
    }

    /// Returns `true` when there are no pipes.
    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty()
    }

    /// Whether `perform` runs the pipes.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Sets the active flag.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Activates the pipeline.
    pub fn enable(&mut self) {
        self.active = true;
    }

    /// Deactivates the pipeline; `perform` becomes the identity.
    pub fn disable(&mut self) {
        self.active = false;
    }

    /// Folds `value` through the pipes, left to right.
    ///
    /// # Errors
    ///
    /// Returns the first hard failure reported by a pipe.
    pub fn perform(&self, value: PipeValue) -> Result<PipeValue, PipeError> {
        if !self.active {
            return Ok(value);
        }
        self.pipes
            .iter()
            .try_fold(value, |value, pipe| pipe.transform(value))
    }
}
