#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for cardtree.
//!
//! Three layers, leaf-first:
//! - **Types**: [`ElementType`] capability flags and the [`TypeRegistry`]
//!   (subtype chains plus the implied-coercion table)
//! - **Declarations**: [`Declaration`] with its left/right [`SlotSpec`]s
//! - **Table**: the immutable, name-keyed [`DeclarationTable`], produced once
//!   by a [`TableBuilder`]

mod declaration;
mod element_type;
mod interner;
mod invariants;
mod registry;
mod slot;
mod table;

#[cfg(test)]
mod element_type_tests;
#[cfg(test)]
mod table_tests;

pub use declaration::{BuiltinScope, Declaration, Evaluation};
pub use element_type::ElementType;
pub use interner::{Interner, Symbol};
pub use registry::{Coercion, TypeRegistry};
pub use slot::{Cardinality, SlotKind, SlotSpec, Template};
pub use table::{DeclId, DeclarationTable, SEQUENCE, TableBuilder};

/// Errors raised while assembling a declaration table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("`{0}` is declared more than once")]
    DuplicateDeclaration(String),

    #[error("`{name}` must produce exactly one element type, found `{ty}`")]
    NotSingleType { name: String, ty: ElementType },

    #[error("`{child}` already inherits from `{existing}`")]
    MultipleInheritance {
        child: ElementType,
        existing: ElementType,
    },

    #[error("subtype `{child}` of `{parent}` would form a cycle")]
    InheritanceCycle {
        child: ElementType,
        parent: ElementType,
    },

    #[error("`{0}` is not a declared element")]
    UnknownElement(String),

    #[error("coercion wrapper `{wrapper}` has no slot accepting `{source_ty}`")]
    CoercionWithoutSlot { wrapper: String, source_ty: ElementType },

    #[error("template `{template}` in `{owner}` produces `{found}`, slot expects `{expected}`")]
    TemplateTypeMismatch {
        owner: String,
        template: String,
        expected: ElementType,
        found: ElementType,
    },

    #[error("one-of slot in `{0}` has no options")]
    EmptyOneOf(String),

    #[error("implied slot in `{0}` has no options")]
    EmptyImplied(String),
}

/// Result type for table assembly.
pub type Result<T> = std::result::Result<T, TableError>;
