//! Evaluator for complete cardtree command trees.
//!
//! Builtin elements are bound to host closures through [`Bindings`]; declared
//! functions are expanded from their body templates at call time.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod engine;

pub use engine::{
    Arg, Args, Bindings, CallContext, EvalError, Evaluator, FromValue, FuelLimits, Value, ValueKind,
};

pub type Result<T> = std::result::Result<T, EvalError>;
