//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::build::BuildArgs;
use crate::commands::check::CheckArgs;
use crate::commands::decls::DeclsArgs;

pub struct CheckParams {
    pub decls_path: PathBuf,
    pub strict: bool,
    pub color: ColorChoice,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            decls_path: decls_path(m),
            strict: m.get_flag("strict"),
            color: parse_color(m),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            decls_path: p.decls_path,
            strict: p.strict,
            color: p.color.should_colorize(),
        }
    }
}

pub struct BuildParams {
    pub decls_path: PathBuf,
    pub tokens: Vec<String>,
    pub root: String,
    pub allowed: bool,
    pub json: bool,
    pub ids: bool,
    pub types: bool,
    pub color: ColorChoice,
}

impl BuildParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            decls_path: decls_path(m),
            tokens: m
                .get_many::<String>("tokens")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            root: m
                .get_one::<String>("root")
                .cloned()
                .unwrap_or_else(|| cardtree_lib::DEFAULT_ROOT.to_owned()),
            allowed: m.get_flag("allowed"),
            json: m.get_flag("json"),
            ids: m.get_flag("ids"),
            types: m.get_flag("types"),
            color: parse_color(m),
        }
    }
}

impl From<BuildParams> for BuildArgs {
    fn from(p: BuildParams) -> Self {
        Self {
            decls_path: p.decls_path,
            tokens: p.tokens,
            root: p.root,
            allowed: p.allowed,
            json: p.json,
            ids: p.ids,
            types: p.types,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DeclsParams {
    pub decls_path: PathBuf,
    pub arguments: bool,
    pub color: ColorChoice,
}

impl DeclsParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            decls_path: decls_path(m),
            arguments: m.get_flag("arguments"),
            color: parse_color(m),
        }
    }
}

impl From<DeclsParams> for DeclsArgs {
    fn from(p: DeclsParams) -> Self {
        Self {
            decls_path: p.decls_path,
            arguments: p.arguments,
            color: p.color.should_colorize(),
        }
    }
}

fn decls_path(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("decls_path")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("-"))
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
