use std::fs;
use std::io::{self, Read};
use std::path::Path;

use cardtree_core::DeclarationTable;

/// Declaration source with the name diagnostics refer to it by.
pub struct Loaded {
    pub name: String,
    pub source: String,
}

/// Read a declaration file; "-" reads stdin.
pub fn read_source(path: &Path) -> Result<Loaded, String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        return Ok(Loaded {
            name: "<stdin>".to_owned(),
            source,
        });
    }

    let source = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{}': {}", path.display(), e))?;
    Ok(Loaded {
        name: path.to_string_lossy().into_owned(),
        source,
    })
}

/// Compile declarations, rendering diagnostics into the error on failure.
/// Warnings of a successful compile are dropped.
pub fn load_table(path: &Path, color: bool) -> Result<DeclarationTable, String> {
    let loaded = read_source(path)?;
    let (table, diagnostics) = cardtree_compiler::compile_with_diagnostics(&loaded.source);
    table.ok_or_else(|| {
        diagnostics
            .printer()
            .source(&loaded.source)
            .path(&loaded.name)
            .colored(color)
            .render()
    })
}
