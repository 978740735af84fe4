//! Lowering: AST to [`DeclarationTable`].
//!
//! Names are collected first so templates may reference elements declared
//! further down. Each function's named parameters become argument elements
//! (`Function.param`) that are only visible inside that function's bodies.

use std::collections::HashMap;

use indexmap::IndexMap;

use cardtree_core::{
    BuiltinScope, Cardinality, DeclarationTable, Declaration, ElementType, Evaluation, SlotSpec,
    Symbol, TableBuilder, TableError, Template,
};

use crate::diagnostics::{DiagnosticKind, Diagnostics, Span};
use crate::parser::ast::{DeclItem, DeclKind, Item, Name, ParamItem, SourceFile, TemplateItem};
use crate::parser::{SCOPE_CONTEXT, SCOPE_GLOBAL};

/// Names visible inside a function body, mapped to their argument elements.
type Scope = HashMap<String, Symbol>;

pub(crate) fn lower(file: &SourceFile, diagnostics: &mut Diagnostics) -> Option<DeclarationTable> {
    let mut lowering = Lowering {
        builder: TableBuilder::new(),
        diagnostics,
        declared: IndexMap::new(),
    };
    lowering.file(file);
    lowering.finish()
}

struct Lowering<'d> {
    builder: TableBuilder,
    diagnostics: &'d mut Diagnostics,
    /// Declared element names and the span of their name token.
    declared: IndexMap<String, Span>,
}

impl Lowering<'_> {
    fn file(&mut self, file: &SourceFile) {
        let mut decls = Vec::new();
        for item in &file.items {
            if let Item::Decl(decl) = item {
                if let Some(&first) = self.declared.get(&decl.name.text) {
                    self.diagnostics
                        .report(DiagnosticKind::DuplicateDeclaration, decl.name.span)
                        .message(&decl.name.text)
                        .related_to("first declared here", first)
                        .emit();
                    continue;
                }
                self.declared.insert(decl.name.text.clone(), decl.name.span);
                decls.push(decl);
            }
        }

        for item in &file.items {
            match item {
                Item::Subtype { child, parent } => self.subtype(child, parent),
                Item::Coerce { wrapper, sources } => self.coerce(wrapper, sources),
                Item::Decl(_) => {}
            }
        }

        for decl in decls {
            self.decl(decl);
        }
    }

    fn finish(self) -> Option<DeclarationTable> {
        if self.diagnostics.has_errors() {
            return None;
        }
        match self.builder.finish() {
            Ok(table) => Some(table),
            Err(err) => {
                let span = owner_of(&err)
                    .and_then(|name| self.declared.get(name).copied())
                    .unwrap_or_default();
                self.diagnostics
                    .report(DiagnosticKind::TableCheck, span)
                    .message(err.to_string())
                    .emit();
                None
            }
        }
    }

    fn subtype(&mut self, child: &Name, parent: &Name) {
        let (Some(child_ty), Some(parent_ty)) = (self.single_type(child), self.single_type(parent))
        else {
            return;
        };
        if let Err(err) = self.builder.subtype(child_ty, parent_ty) {
            self.diagnostics
                .report(DiagnosticKind::InvalidSubtype, child.span.cover(parent.span))
                .message(err.to_string())
                .emit();
        }
    }

    fn coerce(&mut self, wrapper: &Name, sources: &[Name]) {
        if !self.declared.contains_key(&wrapper.text) {
            self.undefined(wrapper);
            return;
        }
        for source in sources {
            if let Some(ty) = self.type_name(source) {
                self.builder.coerce(&wrapper.text, ty);
            }
        }
    }

    fn decl(&mut self, item: &DeclItem) {
        let Some(ty) = self.single_type(&item.ty) else {
            return;
        };
        let name = self.builder.intern(&item.name.text);

        let evaluation_scope = match (item.kind, &item.scope) {
            (DeclKind::Function, Some(scope)) => {
                self.diagnostics
                    .report(DiagnosticKind::ScopeOnFunction, scope.span)
                    .emit();
                BuiltinScope::Global
            }
            (_, Some(scope)) if scope.text == SCOPE_CONTEXT => BuiltinScope::Context,
            (_, Some(scope)) => {
                debug_assert_eq!(scope.text, SCOPE_GLOBAL);
                BuiltinScope::Global
            }
            (_, None) => BuiltinScope::Global,
        };

        let params: Vec<&ParamItem> = item.left.iter().chain(item.params.iter()).collect();
        let scope = match item.kind {
            DeclKind::Function => self.arguments(name, &item.name.text, &params),
            DeclKind::Builtin => Scope::new(),
        };

        let left = item.left.as_ref().and_then(|p| self.param(p));
        let right: Vec<SlotSpec> = item
            .params
            .iter()
            .filter_map(|p| self.param(p))
            .collect();

        let evaluation = match item.kind {
            DeclKind::Builtin => {
                if let Some(body) = item.bodies.first() {
                    self.diagnostics
                        .report(DiagnosticKind::BodyInBuiltin, body.name.span)
                        .emit();
                }
                Evaluation::Builtin(evaluation_scope)
            }
            DeclKind::Function => {
                self.report_unused(&params, &item.bodies);
                let Some(body) = self.body(item, &scope) else {
                    return;
                };
                Evaluation::Function { body }
            }
        };

        let mut decl = Declaration::new(name, ty, evaluation).with_actors(item.actors);
        decl.left = left;
        decl.right = right;
        self.declare(decl, item.name.span);
    }

    /// Declare one argument element per named, single-typed parameter.
    fn arguments(&mut self, function: Symbol, function_name: &str, params: &[&ParamItem]) -> Scope {
        let mut scope = Scope::new();
        for (index, param) in params.iter().enumerate() {
            let (Some(name), Some(ty)) = (&param.name, &param.ty) else {
                continue;
            };
            let Some(ty) = ElementType::parse(&ty.text).filter(|t| t.is_single()) else {
                continue;
            };
            let qualified = format!("{function_name}.{}", name.text);
            let sym = self.builder.intern(&qualified);
            let decl = Declaration::new(sym, ty, Evaluation::Argument { function, index });
            self.declare(decl, name.span);
            scope.insert(name.text.clone(), sym);
        }
        scope
    }

    fn body(&mut self, item: &DeclItem, scope: &Scope) -> Option<Template> {
        let mut bodies = Vec::new();
        let mut ok = true;
        for body in &item.bodies {
            match self.template(body, scope) {
                Some(t) => bodies.push(t),
                None => ok = false,
            }
        }
        if !ok {
            return None;
        }
        match bodies.len() {
            0 => {
                self.diagnostics
                    .report(DiagnosticKind::MissingBody, item.name.span)
                    .emit();
                None
            }
            1 => bodies.pop(),
            _ => {
                let sequence = self.builder.sequence();
                let folded = bodies
                    .into_iter()
                    .fold(Template::leaf(sequence), Template::with_child);
                Some(folded)
            }
        }
    }

    fn param(&mut self, param: &ParamItem) -> Option<SlotSpec> {
        let flags = param.flags;

        let spec = if flags.one_of {
            if let Some(template) = param.templates.first() {
                self.diagnostics
                    .report(DiagnosticKind::MisplacedTemplate, template.name.span)
                    .emit();
            }
            let options: Vec<SlotSpec> = param
                .options
                .iter()
                .filter_map(|o| self.param(o))
                .collect();
            SlotSpec::one_of(options, !flags.optional)
        } else {
            if let Some(option) = param.options.first() {
                self.diagnostics
                    .report(DiagnosticKind::MisplacedOptions, option.span)
                    .emit();
            }
            let accepts = self.param_type(param)?;
            let templates: Vec<Template> = param
                .templates
                .iter()
                .filter_map(|t| self.template(t, &Scope::new()))
                .collect();

            if flags.implied {
                if param.templates.is_empty() {
                    self.diagnostics
                        .report(DiagnosticKind::MissingImpliedElement, param.span)
                        .emit();
                }
                SlotSpec::implied(accepts, templates, !flags.optional)
            } else {
                let cardinality = Cardinality {
                    repeatable: flags.repeatable,
                    required: !flags.optional,
                };
                let spec = SlotSpec::new(accepts, cardinality);
                match (param.templates.as_slice(), templates.into_iter().next()) {
                    ([], _) | (_, None) => spec,
                    ([_], Some(default)) if flags.optional => spec.with_default(default),
                    ([first], Some(_)) => {
                        self.diagnostics
                            .report(DiagnosticKind::DefaultOnRequired, first.name.span)
                            .emit();
                        spec
                    }
                    ([_, second, ..], Some(_)) => {
                        self.diagnostics
                            .report(DiagnosticKind::TooManyDefaults, second.name.span)
                            .emit();
                        spec
                    }
                }
            }
        };

        let spec = match &param.name {
            Some(name) => {
                let sym = self.builder.intern(&name.text);
                spec.named(sym)
            }
            None => spec,
        };
        Some(spec.permutable(flags.permutable))
    }

    fn param_type(&mut self, param: &ParamItem) -> Option<ElementType> {
        match &param.ty {
            Some(ty) => self.type_name(ty),
            None => {
                self.diagnostics
                    .report(DiagnosticKind::ExpectedTypeName, param.span)
                    .emit();
                None
            }
        }
    }

    fn template(&mut self, item: &TemplateItem, scope: &Scope) -> Option<Template> {
        let name = match scope.get(&item.name.text) {
            Some(&arg) => Some(arg),
            None if self.declared.contains_key(&item.name.text) => {
                Some(self.builder.intern(&item.name.text))
            }
            None => {
                self.undefined(&item.name);
                None
            }
        };

        let mut template = name.map(Template::leaf);
        for child in &item.children {
            let lowered = self.template(child, scope);
            template = match (template, lowered) {
                (Some(t), Some(c)) if child.is_left => Some(t.with_left(c)),
                (Some(t), Some(c)) => Some(t.with_child(c)),
                _ => None,
            };
        }
        template
    }

    fn report_unused(&mut self, params: &[&ParamItem], bodies: &[TemplateItem]) {
        for param in params {
            let Some(name) = &param.name else {
                continue;
            };
            if !bodies.iter().any(|b| mentions(b, &name.text)) {
                self.diagnostics
                    .report(DiagnosticKind::UnusedArgument, name.span)
                    .message(&name.text)
                    .emit();
            }
        }
    }

    fn declare(&mut self, decl: Declaration, span: Span) {
        if let Err(err) = self.builder.declare(decl) {
            self.diagnostics
                .report(DiagnosticKind::TableCheck, span)
                .message(err.to_string())
                .emit();
        }
    }

    fn type_name(&mut self, name: &Name) -> Option<ElementType> {
        let ty = ElementType::parse(&name.text);
        if ty.is_none() {
            self.diagnostics
                .report(DiagnosticKind::UnknownType, name.span)
                .message(&name.text)
                .emit();
        }
        ty
    }

    /// A type name that denotes exactly one category.
    fn single_type(&mut self, name: &Name) -> Option<ElementType> {
        let ty = self.type_name(name)?;
        if !ty.is_single() {
            self.diagnostics
                .report(DiagnosticKind::UnknownType, name.span)
                .message(&name.text)
                .emit();
            return None;
        }
        Some(ty)
    }

    fn undefined(&mut self, name: &Name) {
        self.diagnostics
            .report(DiagnosticKind::UndefinedElement, name.span)
            .message(&name.text)
            .emit();
    }
}

fn mentions(template: &TemplateItem, name: &str) -> bool {
    template.name.text == name || template.children.iter().any(|c| mentions(c, name))
}

/// Declaration an assembly error is attributed to.
fn owner_of(err: &TableError) -> Option<&str> {
    match err {
        TableError::DuplicateDeclaration(name)
        | TableError::UnknownElement(name)
        | TableError::EmptyOneOf(name)
        | TableError::EmptyImplied(name)
        | TableError::NotSingleType { name, .. }
        | TableError::CoercionWithoutSlot { wrapper: name, .. }
        | TableError::TemplateTypeMismatch { owner: name, .. } => Some(name.as_str()),
        TableError::MultipleInheritance { .. } | TableError::InheritanceCycle { .. } => None,
    }
}
