use std::io;
use std::sync::{Arc, Mutex};

use indoc::indoc;

use cardtree_core::DeclarationTable;

use crate::{AllowedTypes, Session, SessionConfig, TreePrinter};

pub const RTS: &str = include_str!("../../../demos/rts.decl");

/// Declarations of the reference walkthrough: an attack on an implied
/// selector built from a set and a range filter.
pub const ATTACK: &str = indoc! {"
    Builtin Command Command
        Parameter Repeatable Action
    Builtin Attack Action
        Parameter Selector
    Builtin Selector Selector
        Parameter Optional Set
        Parameter Repeatable Optional Filter
    Builtin Enemies Set
    Builtin Zero Number
    Builtin Within_Range Filter
        Parameter Optional Number
            Zero
    Coerce Selector Set Filter
"};

pub fn compile(source: &str) -> DeclarationTable {
    match cardtree_compiler::compile_with_diagnostics(source) {
        (Some(table), _) => table,
        (None, diagnostics) => panic!("{}", diagnostics.render(source)),
    }
}

pub fn session<'t>(table: &'t DeclarationTable, root: &str) -> Session<'t> {
    Session::new(table, SessionConfig::default().with_root(root)).unwrap()
}

/// Apply whitespace-separated tokens, panicking on the first rejection.
pub fn feed(session: &mut Session<'_>, tokens: &str) {
    for token in tokens.split_whitespace() {
        let token = crate::Token::parse(token);
        if let Err(err) = session.apply(&token) {
            panic!("`{token}` rejected: {err}");
        }
    }
}

pub fn dump(session: &Session<'_>) -> String {
    TreePrinter::new(session.tree()).dump()
}

pub fn dump_allowed(allowed: &AllowedTypes) -> String {
    let mut out = String::from("priority:");
    for a in &allowed.priority {
        let marker = if a.is_left { "<" } else { "" };
        out.push_str(&format!(" {marker}{}", a.ty));
    }
    out.push_str("\nright:");
    for (ty, count) in &allowed.total_right {
        out.push_str(&format!(" {ty}={count}"));
    }
    out.push_str("\nleft:");
    for (ty, count) in &allowed.total_left {
        out.push_str(&format!(" {ty}={count}"));
    }
    out.push_str("\ninstructions:");
    for (instruction, count) in &allowed.instructions {
        out.push_str(&format!(" {instruction:?}={count}"));
    }
    out.push_str(&format!("\ncomplete: {}\n", allowed.complete));
    out
}

/// Run `f` under a plain-text subscriber and return what it logged.
pub fn captured_logs(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
