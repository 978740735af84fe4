//! Evaluation engine.
//!
//! The evaluator walks a satisfied tree depth first. Every slot becomes one
//! [`Arg`]; builtins receive them through [`Args`], declared functions through
//! an argument frame that their body's argument elements read from.

mod args;
mod bindings;
mod error;
mod evaluator;
mod frame;
mod value;

#[cfg(test)]
mod evaluator_tests;

pub use args::{Arg, Args};
pub use bindings::{Bindings, CallContext};
pub use error::EvalError;
pub use evaluator::{Evaluator, FuelLimits};
pub use value::{FromValue, Value, ValueKind};
