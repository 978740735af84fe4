//! Slot values handed to bound builtins.

use super::{EvalError, FromValue, Value};
use crate::Result;

/// Value of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Optional slot left empty, without a default.
    Missing,
    Single(Value),
    /// Repeatable slot, in placement order.
    Repeated(Vec<Value>),
}

impl Arg {
    /// Flatten into a single value: `Null` when missing, a list when repeated.
    pub fn into_value(self) -> Value {
        match self {
            Arg::Missing => Value::Null,
            Arg::Single(value) => value,
            Arg::Repeated(values) => Value::List(values),
        }
    }

    /// Last value the slot produced, if any.
    pub fn last(&self) -> Option<&Value> {
        match self {
            Arg::Missing => None,
            Arg::Single(value) => Some(value),
            Arg::Repeated(values) => values.last(),
        }
    }
}

/// Arguments of one call: the left slot first, then the right slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    element: String,
    args: Vec<Arg>,
}

impl Args {
    pub fn new(element: impl Into<String>, args: Vec<Arg>) -> Self {
        Self {
            element: element.into(),
            args,
        }
    }

    /// Name of the element being called.
    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn arg(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    /// Required argument converted to `T`. Repeated slots convert as a list.
    pub fn get<T: FromValue>(&self, index: usize) -> Result<T> {
        match self.args.get(index) {
            Some(Arg::Single(value)) => T::from_value(value),
            Some(Arg::Repeated(values)) => T::from_value(&Value::List(values.clone())),
            Some(Arg::Missing) | None => Err(self.missing(index)),
        }
    }

    /// Optional argument converted to `T`.
    pub fn opt<T: FromValue>(&self, index: usize) -> Result<Option<T>> {
        match self.args.get(index) {
            Some(Arg::Missing) => Ok(None),
            Some(_) => self.get(index).map(Some),
            None => Err(self.missing(index)),
        }
    }

    /// Every value of a slot, whatever its cardinality.
    pub fn list<T: FromValue>(&self, index: usize) -> Result<Vec<T>> {
        match self.args.get(index) {
            Some(Arg::Missing) => Ok(Vec::new()),
            Some(Arg::Single(value)) => Ok(vec![T::from_value(value)?]),
            Some(Arg::Repeated(values)) => values.iter().map(T::from_value).collect(),
            None => Err(self.missing(index)),
        }
    }

    pub fn into_values(self) -> Vec<Value> {
        self.args.into_iter().map(Arg::into_value).collect()
    }

    fn missing(&self, index: usize) -> EvalError {
        EvalError::MissingArgument {
            element: self.element.clone(),
            index,
        }
    }
}
