//! Syntax tree of a declaration source.
//!
//! Names keep their source text and span; resolution to symbols and element
//! types happens in lowering.

use crate::diagnostics::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// `Subtype <Child> <Parent>`
    Subtype { child: Name, parent: Name },
    /// `Coerce <Wrapper> <SourceType>...`
    Coerce { wrapper: Name, sources: Vec<Name> },
    Decl(DeclItem),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Builtin,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclItem {
    pub kind: DeclKind,
    pub name: Name,
    pub ty: Name,
    /// `Global` or `Context`.
    pub scope: Option<Name>,
    pub actors: bool,
    pub left: Option<ParamItem>,
    pub params: Vec<ParamItem>,
    pub bodies: Vec<TemplateItem>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamFlags {
    pub repeatable: bool,
    pub optional: bool,
    pub implied: bool,
    pub one_of: bool,
    pub permutable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamItem {
    pub name: Option<Name>,
    pub flags: ParamFlags,
    pub ty: Option<Name>,
    /// Default or implied values.
    pub templates: Vec<TemplateItem>,
    /// One-of possibilities.
    pub options: Vec<ParamItem>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateItem {
    pub name: Name,
    /// Written with a leading `<`: fills the parent's left slot.
    pub is_left: bool,
    pub children: Vec<TemplateItem>,
}
