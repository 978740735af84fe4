//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("cardtree")
        .about("Build typed command trees one token at a time")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(build_command())
        .subcommand(decls_command())
}

/// Validate a declaration file and its templates.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Validate a declaration file")
        .override_usage(
            "\
  cardtree check <DECLS>
  cardtree check <DECLS> --strict",
        )
        .after_help(
            r#"EXAMPLES:
  cardtree check rts.decl             # errors only
  cardtree check rts.decl --strict    # warnings fail too
  cat rts.decl | cardtree check -     # read from stdin"#,
        )
        .arg(decls_path_arg())
        .arg(strict_arg())
        .arg(color_arg())
}

/// Feed tokens to a session and print the resulting tree.
pub fn build_command() -> Command {
    Command::new("build")
        .about("Build a command tree from tokens")
        .override_usage(
            "\
  cardtree build <DECLS> [TOKENS]...
  cardtree build <DECLS> --root <NAME> [TOKENS]...",
        )
        .after_help(
            r#"EXAMPLES:
  cardtree build rts.decl Attack Enemies            # print the tree
  cardtree build rts.decl Attack --allowed          # what may come next
  cardtree build rts.decl Move Coordinates One Two :skip Three
  cardtree build rts.decl Attack Enemies :undo --json"#,
        )
        .arg(decls_path_arg())
        .arg(tokens_arg())
        .arg(root_arg())
        .arg(allowed_arg())
        .arg(json_arg())
        .arg(ids_arg())
        .arg(types_arg())
        .arg(color_arg())
}

/// List declarations with their slot signatures.
pub fn decls_command() -> Command {
    Command::new("decls")
        .about("List declared elements and their slots")
        .override_usage("  cardtree decls <DECLS> [--arguments]")
        .after_help(
            r#"EXAMPLES:
  cardtree decls rts.decl               # elements in declaration order
  cardtree decls rts.decl --arguments   # include function arguments"#,
        )
        .arg(decls_path_arg())
        .arg(arguments_arg())
        .arg(color_arg())
}
