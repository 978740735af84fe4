#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compiler for the cardtree declaration format.
//!
//! # Example
//!
//! ```
//! let source = "
//! Builtin Enemies Set
//! Builtin Selector Selector
//!     Parameter Optional Set
//! Coerce Selector Set
//! ";
//!
//! let table = cardtree_compiler::compile(source).expect("valid declarations");
//! assert!(table.lookup("Selector").is_some());
//! ```

pub mod diagnostics;
mod lower;
pub mod parser;

#[cfg(test)]
mod lower_tests;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity, Span};

use cardtree_core::DeclarationTable;

/// Errors that can occur while compiling declarations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("declarations failed to compile with {} errors", .0.error_count())]
    Declarations(Diagnostics),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Compile a declaration source into an immutable table.
///
/// Warnings are dropped; use [`compile_with_diagnostics`] to keep them.
pub fn compile(source: &str) -> Result<DeclarationTable> {
    match compile_with_diagnostics(source) {
        (Some(table), _) => Ok(table),
        (None, diagnostics) => Err(Error::Declarations(diagnostics)),
    }
}

/// Compile and return every diagnostic, including warnings.
///
/// The table is `None` whenever an error was reported.
pub fn compile_with_diagnostics(source: &str) -> (Option<DeclarationTable>, Diagnostics) {
    let (file, mut diagnostics) = parser::parse(source);
    let table = lower::lower(&file, &mut diagnostics);

    match &table {
        Some(table) => tracing::debug!(
            declarations = table.len(),
            warnings = diagnostics.len(),
            "declarations compiled"
        ),
        None => tracing::warn!(
            errors = diagnostics.error_count(),
            "declarations rejected"
        ),
    }

    (table, diagnostics)
}
