//! Declaration listing: one header per element, one line per slot.
//!
//! Slot markers follow the element name: `?` optional, `*` any number,
//! `+` at least one. Unnamed slots print as `_`.

use std::fmt::Write;
use std::path::PathBuf;

use cardtree_core::{BuiltinScope, Declaration, DeclarationTable, Evaluation, SlotKind, SlotSpec, Template};

use super::loader::load_table;

const INDENT: &str = "    ";

pub struct DeclsArgs {
    pub decls_path: PathBuf,
    pub arguments: bool,
    pub color: bool,
}

pub fn run(args: DeclsArgs) {
    let table = match load_table(&args.decls_path, args.color) {
        Ok(table) => table,
        Err(rendered) => {
            eprint!("{}", rendered);
            std::process::exit(1);
        }
    };

    print!("{}", describe(&table, args.arguments));
}

/// List declarations in declaration order.
pub fn describe(table: &DeclarationTable, arguments: bool) -> String {
    let mut out = String::new();
    for (id, decl) in table.iter() {
        if decl.is_argument() && !arguments {
            continue;
        }
        format_decl(&mut out, table, table.name(id), decl).expect("String write never fails");
    }
    out
}

fn format_decl(w: &mut impl Write, table: &DeclarationTable, name: &str, decl: &Declaration) -> std::fmt::Result {
    let kind = match decl.evaluation {
        Evaluation::Sequence => "sequence",
        Evaluation::Builtin(BuiltinScope::Global) => "builtin",
        Evaluation::Builtin(BuiltinScope::Context) => "builtin, context",
        Evaluation::Function { .. } => "function",
        Evaluation::Argument { .. } => "argument",
    };
    let actors = if decl.actors { ", actors" } else { "" };
    writeln!(w, "{name} : {} ({kind}{actors})", decl.ty)?;

    if let Some(spec) = &decl.left {
        format_slot(w, table, spec, 1, true)?;
    }
    for spec in &decl.right {
        format_slot(w, table, spec, 1, false)?;
    }
    Ok(())
}

fn format_slot(
    w: &mut impl Write,
    table: &DeclarationTable,
    spec: &SlotSpec,
    depth: usize,
    is_left: bool,
) -> std::fmt::Result {
    for _ in 0..depth {
        w.write_str(INDENT)?;
    }
    if is_left {
        w.write_str("< ")?;
    }
    let name = spec.name.map_or("_", |sym| table.resolve(sym));
    let marker = match (spec.is_repeatable(), spec.is_required()) {
        (false, true) => "",
        (false, false) => "?",
        (true, false) => "*",
        (true, true) => "+",
    };
    write!(w, "{name}{marker} : ")?;

    match &spec.kind {
        SlotKind::Basic { default } => {
            write!(w, "{}", spec.accepts)?;
            if let Some(default) = default {
                write!(w, " = {}", render_template(table, default))?;
            }
        }
        SlotKind::OneOf(_) => w.write_str("one of")?,
        SlotKind::Implied(options) => {
            let options: Vec<_> = options.iter().map(|t| render_template(table, t)).collect();
            write!(w, "{} implied by {}", spec.accepts, options.join(", "))?;
        }
    }
    if spec.permutable {
        w.write_str(" [permutable]")?;
    }
    writeln!(w)?;

    if let SlotKind::OneOf(options) = &spec.kind {
        for option in options {
            format_slot(w, table, option, depth + 1, false)?;
        }
    }
    Ok(())
}

/// `Name`, or `Name(< left, child, ...)` for nested templates.
fn render_template(table: &DeclarationTable, template: &Template) -> String {
    let mut parts = Vec::new();
    if let Some(left) = &template.left {
        parts.push(format!("< {}", render_template(table, left)));
    }
    parts.extend(template.children.iter().map(|c| render_template(table, c)));

    let name = table.resolve(template.name);
    if parts.is_empty() {
        name.to_owned()
    } else {
        format!("{name}({})", parts.join(", "))
    }
}
