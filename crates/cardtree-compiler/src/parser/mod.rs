//! Parsing of the declaration format: lexing, indentation layout, AST.

pub mod ast;
mod layout;
pub mod lexer;
mod parser;

#[cfg(test)]
mod parser_tests;

pub use parser::{
    KW_ACTORS, KW_BUILTIN, KW_COERCE, KW_FUNCTION, KW_LEFT_PARAMETER, KW_PARAMETER, KW_SUBTYPE,
    SCOPE_CONTEXT, SCOPE_GLOBAL,
};

use crate::diagnostics::Diagnostics;

/// Parse a declaration source. Syntax errors are collected, never fatal.
pub fn parse(source: &str) -> (ast::SourceFile, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = lexer::lex(source);
    let lines = layout::split_lines(source, &tokens, &mut diagnostics);
    let blocks = layout::blocks(lines, &mut diagnostics);

    let mut parser = parser::Parser::new(source, diagnostics);
    let file = parser.file(&blocks);
    (file, parser.finish())
}
