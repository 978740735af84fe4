//! cardtree: build well-typed command trees one token at a time.
//!
//! A [`Session`] owns an in-progress [`Tree`]. Each appended element is
//! placed into the unique slot that accepts it, inserting implied wrapper
//! elements where the type registry allows a coercion. A skip counter walks
//! past earlier candidate slots, and a linear log drives undo and redo.
//!
//! # Example
//!
//! ```
//! use cardtree_lib::{Session, SessionConfig};
//!
//! let source = "
//! Builtin Command Command
//!     Parameter Repeatable Action
//! Builtin Stop Action
//! ";
//!
//! let table = cardtree_compiler::compile(source).expect("valid declarations");
//! let mut session = Session::new(&table, SessionConfig::default()).expect("root declared");
//! session.append("Stop").expect("placed");
//! assert!(session.allowed().complete);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod allowed;
mod builder;
mod invariants;
mod printer;
mod removal;
mod session;
mod slot;
mod template;
mod tree;
mod validate;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod test_utils;

pub use allowed::{AllowedType, AllowedTypes, Instruction};
pub use printer::TreePrinter;
pub use session::{DEFAULT_ROOT, Session, SessionConfig, Token};
pub use slot::Slot;
pub use tree::{Implicit, Node, NodeId, SlotAddr, SlotPos, Tree};
pub use validate::{TemplateIssue, check_templates};

use cardtree_core::ElementType;

/// Errors raised while building or editing a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("`{0}` is not a declared element")]
    DeclarationNotFound(String),

    /// No slot on the active path accepts the element, directly or through
    /// a coercion.
    #[error("no open slot accepts `{element}` ({ty})")]
    TypeMismatch { element: String, ty: ElementType },

    #[error("every slot of `{owner}` that accepts `{element}` is already filled")]
    SlotOccupied { owner: String, element: String },

    /// A required slot before the candidate position is still unfilled.
    #[error("`{element}` is missing a required argument")]
    UnmetPrecedingParameter { element: String },

    #[error("nothing to undo")]
    UndoImpossible,

    #[error("nothing to redo")]
    RedoImpossible,

    #[error("`{0}` is incomplete")]
    Incomplete(String),

    #[error("templates nest deeper than {0} levels")]
    TemplateDepthExceeded(usize),
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, BuildError>;
