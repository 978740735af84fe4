use std::fmt::Write;

use indoc::indoc;

use super::ast::{Item, ParamItem, TemplateItem};
use super::parse;

fn dump(source: &str) -> String {
    let (file, diagnostics) = parse(source);
    let mut out = String::new();
    for item in &file.items {
        match item {
            Item::Subtype { child, parent } => {
                writeln!(out, "Subtype {} < {}", child.text, parent.text).unwrap();
            }
            Item::Coerce { wrapper, sources } => {
                let sources: Vec<_> = sources.iter().map(|s| s.text.as_str()).collect();
                writeln!(out, "Coerce {} <- {}", wrapper.text, sources.join(", ")).unwrap();
            }
            Item::Decl(decl) => {
                write!(out, "{:?} {}: {}", decl.kind, decl.name.text, decl.ty.text).unwrap();
                if let Some(scope) = &decl.scope {
                    write!(out, " scope={}", scope.text).unwrap();
                }
                if decl.actors {
                    write!(out, " actors").unwrap();
                }
                out.push('\n');
                if let Some(left) = &decl.left {
                    dump_param(&mut out, "Left", left, 1);
                }
                for param in &decl.params {
                    dump_param(&mut out, "Param", param, 1);
                }
                for body in &decl.bodies {
                    dump_template(&mut out, "Body", body, 1);
                }
            }
        }
    }
    if !diagnostics.is_empty() {
        out.push_str("---\n");
        out.push_str(&diagnostics.printer().render());
    }
    out
}

fn dump_param(out: &mut String, label: &str, param: &ParamItem, depth: usize) {
    let indent = "  ".repeat(depth);
    write!(out, "{indent}{label}").unwrap();
    if let Some(name) = &param.name {
        write!(out, " {}", name.text).unwrap();
    }
    let f = param.flags;
    for (set, flag) in [
        (f.repeatable, "Repeatable"),
        (f.optional, "Optional"),
        (f.implied, "Implied"),
        (f.one_of, "OneOf"),
        (f.permutable, "Permutable"),
    ] {
        if set {
            write!(out, " [{flag}]").unwrap();
        }
    }
    if let Some(ty) = &param.ty {
        write!(out, " : {}", ty.text).unwrap();
    }
    out.push('\n');
    for template in &param.templates {
        dump_template(out, "=", template, depth + 1);
    }
    for option in &param.options {
        dump_param(out, "Option", option, depth + 1);
    }
}

fn dump_template(out: &mut String, label: &str, template: &TemplateItem, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if template.is_left { "<" } else { "" };
    writeln!(out, "{indent}{label} {marker}{}", template.name.text).unwrap();
    for child in &template.children {
        dump_template(out, "-", child, depth + 1);
    }
}

#[test]
fn registry_directives() {
    let input = indoc! {"
        Subtype Point Location
        Coerce Selector Set Filter
    "};

    insta::assert_snapshot!(dump(input), @r"
    Subtype Point < Location
    Coerce Selector <- Set, Filter
    ");
}

#[test]
fn builtin_with_parameters() {
    let input = indoc! {"
        # actions
        Builtin Attack Action Context Actors
            LeftParameter actors Optional Selector
                Current_Selection
            Parameter target Selector
    "};

    insta::assert_snapshot!(dump(input), @r"
    Builtin Attack: Action scope=Context actors
      Left actors [Optional] : Selector
        = Current_Selection
      Param target : Selector
    ");
}

#[test]
fn single_word_parameter() {
    let input = indoc! {"
        Builtin Selector Selector
            Parameter Optional Set
            Parameter filters Repeatable Optional Filter
            Parameter count
    "};

    insta::assert_snapshot!(dump(input), @r"
    Builtin Selector: Selector
      Param [Optional] : Set
      Param filters [Repeatable] [Optional] : Filter
      Param count
    ");
}

#[test]
fn one_of_options() {
    let input = indoc! {"
        Builtin Move Action
            Parameter destination OneOf
                Parameter Location
                Parameter Selector
    "};

    insta::assert_snapshot!(dump(input), @r"
    Builtin Move: Action
      Param destination [OneOf]
        Option : Location
        Option : Selector
    ");
}

#[test]
fn function_bodies_with_left_templates() {
    let input = indoc! {"
        Function Double Number
            Parameter n Number
            Multiply
                < n
                Two
    "};

    insta::assert_snapshot!(dump(input), @r"
    Function Double: Number
      Param n : Number
      Body Multiply
        - <n
        - Two
    ");
}

#[test]
fn tabs_count_as_indentation() {
    let input = "Builtin Go Action\n\tParameter Location\n";

    insta::assert_snapshot!(dump(input), @r"
    Builtin Go: Action
      Param : Location
    ");
}

#[test]
fn unknown_item_keyword() {
    let input = indoc! {"
        Element Attack Action
        Builtin Stop Action
    "};

    insta::assert_snapshot!(dump(input), @r"
    Builtin Stop: Action
    ---
    error at 0..7: expected `Builtin`, `Function`, `Subtype` or `Coerce`
    ");
}

#[test]
fn missing_type_in_header() {
    let input = "Builtin Attack\n";

    insta::assert_snapshot!(dump(input), @r"
    ---
    error at 14..14: expected an element type
    ");
}

#[test]
fn stray_tokens_reported() {
    let input = "Builtin Attack Action Global Loud\n";

    insta::assert_snapshot!(dump(input), @r"
    Builtin Attack: Action scope=Global
    ---
    error at 29..33: unexpected token: `Loud`
    ");
}

#[test]
fn indented_first_line() {
    let input = "    Builtin Attack Action\n";

    insta::assert_snapshot!(dump(input), @r"
    ---
    error at 4..25: unexpected indentation
    ");
}

#[test]
fn inconsistent_dedent() {
    let input = indoc! {"
        Builtin Attack Action
                Parameter Selector
            Parameter Number
    "};

    insta::assert_snapshot!(dump(input), @r"
    Builtin Attack: Action
      Param : Selector
      Param : Number
    ---
    error at 53..69: indentation does not match any enclosing block
    ");
}

#[test]
fn second_left_parameter() {
    let input = indoc! {"
        Builtin Add Number
            LeftParameter Number
            LeftParameter Number
    "};

    insta::assert_snapshot!(dump(input), @r"
    Builtin Add: Number
      Left : Number
    ---
    error at 48..61: an element has at most one left parameter
    ");
}

#[test]
fn garbage_characters() {
    let input = "Builtin Zero Number ?\n";

    insta::assert_snapshot!(dump(input), @r"
    Builtin Zero: Number
    ---
    error at 20..21: unexpected characters
    ");
}
