use std::fmt::Write;
use std::path::PathBuf;

use serde::Serialize;

use cardtree_core::DeclarationTable;
use cardtree_lib::{AllowedTypes, Session, SessionConfig, Token, TreePrinter};

use super::loader::load_table;

pub struct BuildArgs {
    pub decls_path: PathBuf,
    pub tokens: Vec<String>,
    pub root: String,
    pub allowed: bool,
    pub json: bool,
    pub ids: bool,
    pub types: bool,
    pub color: bool,
}

#[derive(Serialize)]
struct BuildReport<'a> {
    tree: String,
    complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed: Option<AllowedReport<'a>>,
}

#[derive(Serialize)]
struct AllowedReport<'a> {
    types: AllowedTypes,
    elements: Vec<&'a str>,
}

pub fn run(args: BuildArgs) {
    let table = match load_table(&args.decls_path, args.color) {
        Ok(table) => table,
        Err(rendered) => {
            eprint!("{}", rendered);
            std::process::exit(1);
        }
    };

    match execute(&table, &args) {
        Ok(output) => print!("{}", output),
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    }
}

/// Feed every token to a fresh session and render the outcome.
pub fn execute(table: &DeclarationTable, args: &BuildArgs) -> Result<String, String> {
    let config = SessionConfig::default().with_root(args.root.as_str());
    let mut session = Session::new(table, config).map_err(|e| e.to_string())?;

    for text in &args.tokens {
        let token = Token::parse(text);
        session
            .apply(&token)
            .map_err(|e| format!("`{}` rejected: {}", token, e))?;
        tracing::debug!(token = %token, skip = session.skip_count(), "token applied");
    }

    let tree = TreePrinter::new(session.tree())
        .with_ids(args.ids)
        .with_types(args.types)
        .dump();

    if args.json {
        return render_json(&session, tree, args.allowed);
    }

    let mut out = tree;
    if args.allowed {
        render_allowed(&mut out, &session);
    }
    Ok(out)
}

fn render_json(session: &Session<'_>, tree: String, with_allowed: bool) -> Result<String, String> {
    let types = session.allowed();
    let report = BuildReport {
        tree,
        complete: types.complete,
        allowed: with_allowed.then(|| AllowedReport {
            elements: session.allowed_elements(),
            types,
        }),
    };
    let mut json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    json.push('\n');
    Ok(json)
}

fn render_allowed(out: &mut String, session: &Session<'_>) {
    let allowed = session.allowed();

    out.push_str("\nallowed:");
    for name in session.allowed_elements() {
        write!(out, " {name}").expect("String write never fails");
    }
    out.push_str("\ninstructions:");
    for (instruction, count) in &allowed.instructions {
        write!(out, " {instruction:?}={count}").expect("String write never fails");
    }
    writeln!(out, "\ncomplete: {}", allowed.complete).expect("String write never fails");
}
