//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Declaration file (positional, "-" for stdin).
pub fn decls_path_arg() -> Arg {
    Arg::new("decls_path")
        .value_name("DECLS")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("Declaration file (use \"-\" for stdin)")
}

/// Tokens to feed the session, in order (positional, trailing).
pub fn tokens_arg() -> Arg {
    Arg::new("tokens")
        .value_name("TOKENS")
        .num_args(0..)
        .help("Element names and :skip, :undo, :redo, :cancel instructions")
}

/// Root element (--root).
pub fn root_arg() -> Arg {
    Arg::new("root")
        .long("root")
        .value_name("NAME")
        .default_value(cardtree_lib::DEFAULT_ROOT)
        .help("Element every command starts from")
}

/// Print the allowed types after the last token (--allowed).
pub fn allowed_arg() -> Arg {
    Arg::new("allowed")
        .long("allowed")
        .action(ArgAction::SetTrue)
        .help("Show what may be appended next")
}

/// JSON output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print a JSON report instead of text")
}

/// Node handles in tree output (--ids).
pub fn ids_arg() -> Arg {
    Arg::new("ids")
        .long("ids")
        .action(ArgAction::SetTrue)
        .help("Prefix each element with its node handle")
}

/// Element types in tree output (--types).
pub fn types_arg() -> Arg {
    Arg::new("types")
        .long("types")
        .action(ArgAction::SetTrue)
        .help("Suffix each element with its type")
}

/// Include argument elements in listings (--arguments).
pub fn arguments_arg() -> Arg {
    Arg::new("arguments")
        .long("arguments")
        .action(ArgAction::SetTrue)
        .help("Also list the argument elements of functions")
}

/// Treat warnings as errors (--strict).
pub fn strict_arg() -> Arg {
    Arg::new("strict")
        .long("strict")
        .action(ArgAction::SetTrue)
        .help("Treat warnings as errors")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}
