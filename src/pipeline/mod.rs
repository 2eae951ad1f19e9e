//! Response value pipelines.
//!
//! This module provides:
//! - `PipeValue`, the value flowing through a pipeline
//! - `Pipe`, a single value transform, with the JSON and callback built-ins
//! - `Pipeline`, an ordered chain of pipes with an active flag
//!
//! A pipe that cannot handle its input returns `PipeValue::Empty` instead of
//! failing; only a pipe that explicitly opts in returns a `PipeError`.

mod chain;
mod pipe;
mod value;

// Re-export public API
pub use chain::Pipeline;
pub use pipe::{CallbackPipe, JsonPipe, Pipe};
pub use value::PipeValue;
