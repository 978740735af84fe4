use std::path::{Path, PathBuf};

use super::loader::read_source;

pub struct CheckArgs {
    pub decls_path: PathBuf,
    pub strict: bool,
    pub color: bool,
}

/// Outcome of a check: rendered diagnostics plus whether they fail it.
#[derive(Debug)]
pub struct CheckReport {
    pub output: String,
    pub failed: bool,
}

pub fn run(args: CheckArgs) {
    let report = match execute(&args.decls_path, args.strict, args.color) {
        Ok(report) => report,
        Err(msg) => {
            eprintln!("error: {}", msg);
            std::process::exit(1);
        }
    };

    eprint!("{}", report.output);
    if report.failed {
        std::process::exit(1);
    }

    // Silent on success
}

pub fn execute(path: &Path, strict: bool, color: bool) -> Result<CheckReport, String> {
    let loaded = read_source(path)?;
    let (table, diagnostics) = cardtree_compiler::compile_with_diagnostics(&loaded.source);

    let mut output = String::new();
    if !diagnostics.is_empty() {
        output = diagnostics
            .printer()
            .source(&loaded.source)
            .path(&loaded.name)
            .colored(color)
            .render();
    }

    let Some(table) = table else {
        return Ok(CheckReport {
            output,
            failed: true,
        });
    };

    let issues = cardtree_lib::check_templates(&table);
    for issue in &issues {
        output.push_str(&format!("error: {issue}\n"));
    }

    let warned = !diagnostics.is_empty();
    Ok(CheckReport {
        output,
        failed: !issues.is_empty() || (strict && warned),
    })
}
