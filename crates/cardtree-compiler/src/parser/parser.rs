//! Block-structured parser producing the declaration AST.
//!
//! Grammar (one construct per line, nesting by indentation):
//!
//! ```text
//! item      = subtype | coerce | decl
//! subtype   = "Subtype" TYPE TYPE
//! coerce    = "Coerce" NAME TYPE+
//! decl      = ("Builtin" | "Function") NAME TYPE ["Global" | "Context"] ["Actors"]
//!               { "LeftParameter" param | "Parameter" param | template }
//! param     = [name] {FLAG} [TYPE]   { template | "Parameter" param }
//! template  = ["<"] NAME             { template }
//! ```
//!
//! A parameter with a single word is a type when the word starts uppercase,
//! a name otherwise.

use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};

use super::ast::{DeclItem, DeclKind, Item, Name, ParamFlags, ParamItem, SourceFile, TemplateItem};
use super::layout::{Block, Line};
use super::lexer::{Token, TokenKind, token_text};

pub const KW_BUILTIN: &str = "Builtin";
pub const KW_FUNCTION: &str = "Function";
pub const KW_SUBTYPE: &str = "Subtype";
pub const KW_COERCE: &str = "Coerce";
pub const KW_PARAMETER: &str = "Parameter";
pub const KW_LEFT_PARAMETER: &str = "LeftParameter";
pub const KW_ACTORS: &str = "Actors";
pub const SCOPE_GLOBAL: &str = "Global";
pub const SCOPE_CONTEXT: &str = "Context";

pub(super) struct Parser<'src> {
    source: &'src str,
    diagnostics: Diagnostics,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, diagnostics: Diagnostics) -> Self {
        Self {
            source,
            diagnostics,
        }
    }

    pub fn finish(self) -> Diagnostics {
        self.diagnostics
    }

    pub fn file(&mut self, blocks: &[Block]) -> SourceFile {
        let mut file = SourceFile::default();
        for block in blocks {
            if block.line.indent > 0 {
                self.diagnostics
                    .report(DiagnosticKind::UnexpectedIndent, block.line.span())
                    .emit();
                continue;
            }
            if let Some(item) = self.item(block) {
                file.items.push(item);
            }
        }
        file
    }

    fn item(&mut self, block: &Block) -> Option<Item> {
        let line = &block.line;
        let keyword = line.tokens[0];
        let item = match self.text(&keyword) {
            KW_BUILTIN => Item::Decl(self.decl(DeclKind::Builtin, block)?),
            KW_FUNCTION => Item::Decl(self.decl(DeclKind::Function, block)?),
            KW_SUBTYPE => {
                self.reject_children(block);
                let mut words = Words::new(line, 1);
                let child = self.expect_name(&mut words, line, DiagnosticKind::ExpectedTypeName)?;
                let parent = self.expect_name(&mut words, line, DiagnosticKind::ExpectedTypeName)?;
                self.reject_rest(words);
                Item::Subtype { child, parent }
            }
            KW_COERCE => {
                self.reject_children(block);
                let mut words = Words::new(line, 1);
                let wrapper = self.expect_name(&mut words, line, DiagnosticKind::ExpectedName)?;
                let mut sources = Vec::new();
                while let Some(token) = words.next() {
                    if let Some(name) = self.ident(token) {
                        sources.push(name);
                    }
                }
                if sources.is_empty() {
                    self.diagnostics
                        .report(DiagnosticKind::ExpectedTypeName, Span::empty(line.end()))
                        .emit();
                    return None;
                }
                Item::Coerce { wrapper, sources }
            }
            _ => {
                self.diagnostics
                    .report(DiagnosticKind::ExpectedItem, keyword.span)
                    .emit();
                return None;
            }
        };
        Some(item)
    }

    fn decl(&mut self, kind: DeclKind, block: &Block) -> Option<DeclItem> {
        let line = &block.line;
        let mut words = Words::new(line, 1);
        let name = self.expect_name(&mut words, line, DiagnosticKind::ExpectedName)?;
        let ty = self.expect_name(&mut words, line, DiagnosticKind::ExpectedTypeName)?;

        let mut scope = None;
        let mut actors = false;
        for token in words.by_ref() {
            let text = self.text(&token);
            match text {
                SCOPE_GLOBAL | SCOPE_CONTEXT if scope.is_none() => {
                    scope = Some(self.name(&token));
                }
                KW_ACTORS if !actors => actors = true,
                _ => self.unexpected(&token),
            }
        }

        let mut decl = DeclItem {
            kind,
            name,
            ty,
            scope,
            actors,
            left: None,
            params: Vec::new(),
            bodies: Vec::new(),
            span: block.span(),
        };

        for child in &block.children {
            let head = child.line.tokens[0];
            match self.text(&head) {
                KW_LEFT_PARAMETER => {
                    let param = self.param(child);
                    if decl.left.is_some() {
                        self.diagnostics
                            .report(DiagnosticKind::DuplicateLeftParameter, head.span)
                            .emit();
                    } else {
                        decl.left = Some(param);
                    }
                }
                KW_PARAMETER => decl.params.push(self.param(child)),
                _ => {
                    if let Some(body) = self.template(child) {
                        decl.bodies.push(body);
                    }
                }
            }
        }

        Some(decl)
    }

    fn param(&mut self, block: &Block) -> ParamItem {
        let line = &block.line;
        let mut flags = ParamFlags::default();
        let mut words: Vec<Name> = Vec::new();

        for token in Words::new(line, 1) {
            let Some(word) = self.ident(token) else {
                continue;
            };
            match word.text.as_str() {
                "Repeatable" => flags.repeatable = true,
                "Optional" => flags.optional = true,
                "Implied" => flags.implied = true,
                "OneOf" => flags.one_of = true,
                "Permutable" => flags.permutable = true,
                _ => words.push(word),
            }
        }

        let mut words = words.into_iter();
        let (name, ty) = match (words.next(), words.next()) {
            (None, _) => (None, None),
            (Some(only), None) if starts_uppercase(&only.text) => (None, Some(only)),
            (Some(only), None) => (Some(only), None),
            (Some(name), Some(ty)) => (Some(name), Some(ty)),
        };
        for extra in words {
            self.diagnostics
                .report(DiagnosticKind::UnexpectedToken, extra.span)
                .message(format!("`{}`", extra.text))
                .emit();
        }

        let mut param = ParamItem {
            name,
            flags,
            ty,
            templates: Vec::new(),
            options: Vec::new(),
            span: block.span(),
        };

        for child in &block.children {
            let head = child.line.tokens[0];
            match self.text(&head) {
                KW_PARAMETER => param.options.push(self.param(child)),
                KW_LEFT_PARAMETER => self.unexpected(&head),
                _ => {
                    if let Some(template) = self.template(child) {
                        param.templates.push(template);
                    }
                }
            }
        }

        param
    }

    fn template(&mut self, block: &Block) -> Option<TemplateItem> {
        let line = &block.line;
        let mut words = Words::new(line, 0);
        let is_left = words
            .peek()
            .is_some_and(|t| t.kind == TokenKind::LeftMarker);
        if is_left {
            words.next();
        }
        let name = self.expect_name(&mut words, line, DiagnosticKind::ExpectedName)?;
        self.reject_rest(words);

        let mut children: Vec<TemplateItem> = Vec::new();
        for child in &block.children {
            let Some(template) = self.template(child) else {
                continue;
            };
            if template.is_left && children.iter().any(|c| c.is_left) {
                self.diagnostics
                    .report(DiagnosticKind::DuplicateLeftParameter, template.name.span)
                    .emit();
                continue;
            }
            children.push(template);
        }

        Some(TemplateItem {
            name,
            is_left,
            children,
        })
    }

    fn expect_name(&mut self, words: &mut Words<'_>, line: &Line, kind: DiagnosticKind) -> Option<Name> {
        match words.next() {
            Some(token) if token.kind == TokenKind::Ident => Some(self.name(&token)),
            Some(token) => {
                self.diagnostics.report(kind, token.span).emit();
                None
            }
            None => {
                self.diagnostics
                    .report(kind, Span::empty(line.end()))
                    .emit();
                None
            }
        }
    }

    fn ident(&mut self, token: Token) -> Option<Name> {
        if token.kind == TokenKind::Ident {
            return Some(self.name(&token));
        }
        self.unexpected(&token);
        None
    }

    fn reject_rest(&mut self, words: Words<'_>) {
        for token in words {
            self.unexpected(&token);
        }
    }

    fn reject_children(&mut self, block: &Block) {
        if let Some(child) = block.children.first() {
            self.diagnostics
                .report(DiagnosticKind::UnexpectedIndent, child.span())
                .emit();
        }
    }

    fn unexpected(&mut self, token: &Token) {
        let text = self.text(token);
        self.diagnostics
            .report(DiagnosticKind::UnexpectedToken, token.span)
            .message(format!("`{text}`"))
            .emit();
    }

    fn name(&self, token: &Token) -> Name {
        Name {
            text: self.text(token).to_owned(),
            span: token.span,
        }
    }

    fn text(&self, token: &Token) -> &'src str {
        token_text(self.source, token)
    }
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Cursor over the tokens of one line.
struct Words<'l> {
    tokens: std::iter::Peekable<std::slice::Iter<'l, Token>>,
}

impl<'l> Words<'l> {
    fn new(line: &'l Line, skip: usize) -> Self {
        let mut tokens = line.tokens.iter().peekable();
        for _ in 0..skip {
            tokens.next();
        }
        Self { tokens }
    }

    fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek().copied()
    }
}

impl Iterator for Words<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.tokens.next().copied()
    }
}
