use cardtree_lib::BuildError;

use super::ValueKind;

/// Errors raised while evaluating a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    #[error("`{0}` is incomplete")]
    Incomplete(String),

    #[error("no binding for builtin `{0}`")]
    UnboundBuiltin(String),

    /// A `Context` builtin bound as a global function, or the reverse.
    #[error("`{0}` is bound with a different scope than declared")]
    ScopeMismatch(String),

    #[error("`{element}` has no argument at position {index}")]
    MissingArgument { element: String, index: usize },

    #[error("expected {expected}, found {found}")]
    EvaluationTypeMismatch { expected: ValueKind, found: ValueKind },

    #[error("recursion limit of {0} exceeded")]
    RecursionLimitExceeded(u32),

    #[error("evaluation fuel of {0} exhausted")]
    ExecFuelExhausted(u32),

    /// Template of a default or function body failed to instantiate.
    #[error("template: {0}")]
    Template(#[from] BuildError),

    /// Raised by a bound closure.
    #[error("{0}")]
    Builtin(String),
}

impl EvalError {
    pub fn builtin(message: impl Into<String>) -> Self {
        EvalError::Builtin(message.into())
    }
}
