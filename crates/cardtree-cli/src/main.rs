mod cli;
mod commands;

use tracing_subscriber::EnvFilter;

use cli::{BuildParams, CheckParams, DeclsParams, build_cli};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("build", m)) => {
            let params = BuildParams::from_matches(m);
            commands::build::run(params.into());
        }
        Some(("decls", m)) => {
            let params = DeclsParams::from_matches(m);
            commands::decls::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
