//! Line splitting and indentation blocks.
//!
//! The declaration format is line oriented: a line's children are the
//! following lines indented deeper than it. Tabs count as four columns.

use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};

use super::lexer::{Token, TokenKind, token_text};

const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone)]
pub struct Line {
    pub indent: usize,
    /// Non-trivia tokens, never empty.
    pub tokens: Vec<Token>,
}

impl Line {
    pub fn span(&self) -> Span {
        let first = self.tokens[0].span;
        let last = self.tokens[self.tokens.len() - 1].span;
        first.cover(last)
    }

    pub fn end(&self) -> usize {
        self.span().end as usize
    }
}

#[derive(Debug, Clone)]
pub struct Block {
    pub line: Line,
    pub children: Vec<Block>,
}

impl Block {
    /// Span of the line and every nested line.
    pub fn span(&self) -> Span {
        self.children
            .iter()
            .fold(self.line.span(), |acc, child| acc.cover(child.span()))
    }
}

pub fn split_lines(source: &str, tokens: &[Token], diagnostics: &mut Diagnostics) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut indent = 0;
    let mut at_line_start = true;
    let mut current: Vec<Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Newline => {
                if !current.is_empty() {
                    lines.push(Line {
                        indent,
                        tokens: std::mem::take(&mut current),
                    });
                }
                indent = 0;
                at_line_start = true;
                continue;
            }
            TokenKind::Whitespace if at_line_start => {
                indent = token_text(source, token)
                    .chars()
                    .map(|c| if c == '\t' { TAB_WIDTH } else { 1 })
                    .sum();
            }
            TokenKind::Garbage => {
                diagnostics
                    .report(DiagnosticKind::UnexpectedFragment, token.span)
                    .emit();
            }
            kind if kind.is_trivia() => {}
            _ => current.push(*token),
        }
        at_line_start = false;
    }

    if !current.is_empty() {
        lines.push(Line {
            indent,
            tokens: current,
        });
    }

    lines
}

/// Group lines into blocks. Top-level blocks are returned regardless of their
/// indentation; the caller decides whether that is an error.
pub fn blocks(lines: Vec<Line>, diagnostics: &mut Diagnostics) -> Vec<Block> {
    let mut pos = 0;
    let mut out = Vec::new();
    while pos < lines.len() {
        out.extend(nested(&lines, &mut pos, None, diagnostics));
    }
    out
}

fn nested(
    lines: &[Line],
    pos: &mut usize,
    parent_indent: Option<usize>,
    diagnostics: &mut Diagnostics,
) -> Vec<Block> {
    let mut out = Vec::new();
    let Some(first) = lines.get(*pos) else {
        return out;
    };
    let block_indent = first.indent;

    while let Some(line) = lines.get(*pos) {
        if parent_indent.is_some_and(|p| line.indent <= p) {
            break;
        }
        if parent_indent.is_none() && !out.is_empty() && line.indent != block_indent {
            break;
        }
        if line.indent < block_indent {
            diagnostics
                .report(DiagnosticKind::InconsistentIndent, line.span())
                .emit();
        }
        *pos += 1;
        let children = nested(lines, pos, Some(line.indent), diagnostics);
        out.push(Block {
            line: line.clone(),
            children,
        });
    }

    out
}
