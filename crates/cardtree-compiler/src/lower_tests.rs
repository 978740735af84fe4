use indoc::indoc;

use cardtree_core::{ElementType, Evaluation, SlotKind};

use crate::{DiagnosticKind, compile, compile_with_diagnostics};

fn errors(source: &str) -> String {
    let (table, diagnostics) = compile_with_diagnostics(source);
    assert!(table.is_none(), "expected compilation to fail");
    diagnostics.printer().render()
}

fn kinds(source: &str) -> Vec<DiagnosticKind> {
    let (_, diagnostics) = compile_with_diagnostics(source);
    diagnostics.kinds().collect()
}

#[test]
fn builtins_and_slots() {
    let input = indoc! {"
        Builtin Enemies Set
        Builtin Selector Selector
            Parameter Optional Set
            Parameter filters Repeatable Optional Filter
        Builtin Attack Action Context Actors
            Parameter Selector
    "};

    let table = compile(input).unwrap();
    let selector = table.get(table.lookup("Selector").unwrap());
    assert_eq!(selector.ty, ElementType::SELECTOR);
    assert_eq!(selector.right.len(), 2);
    assert!(!selector.right[0].is_required());
    assert!(selector.right[1].is_repeatable());
    assert_eq!(table.resolve(selector.right[1].name.unwrap()), "filters");

    let attack = table.get(table.lookup("Attack").unwrap());
    assert!(attack.actors);
    assert_eq!(
        attack.evaluation,
        Evaluation::Builtin(cardtree_core::BuiltinScope::Context)
    );
}

#[test]
fn coercions_reach_the_registry() {
    let input = indoc! {"
        Builtin Enemies Set
        Builtin Selector Selector
            Parameter Optional Set
        Coerce Selector Set
    "};

    let table = compile(input).unwrap();
    let wrapper = table
        .registry()
        .implied_wrapper_for(ElementType::SET, ElementType::SELECTOR)
        .unwrap();
    assert_eq!(table.resolve(wrapper), "Selector");
}

#[test]
fn function_arguments_are_scoped() {
    let input = indoc! {"
        Builtin Two Number
        Builtin Multiply Number
            LeftParameter Number
            Parameter Number
        Function Double Number
            Parameter n Number
            Multiply
                < n
                Two
    "};

    let table = compile(input).unwrap();
    assert!(table.lookup("n").is_none());

    let arg = table.get(table.lookup("Double.n").unwrap());
    assert!(arg.is_argument());
    assert_eq!(arg.ty, ElementType::NUMBER);

    let double = table.get(table.lookup("Double").unwrap());
    let Evaluation::Function { body } = &double.evaluation else {
        panic!("expected a function");
    };
    assert_eq!(table.resolve(body.name), "Multiply");
    assert_eq!(table.resolve(body.left.as_ref().unwrap().name), "Double.n");
    assert_eq!(table.resolve(body.children[0].name), "Two");
}

#[test]
fn several_bodies_fold_into_sequence() {
    let input = indoc! {"
        Builtin Stop Action
        Builtin Hold Action
        Function Halt Action
            Stop
            Hold
    "};

    let table = compile(input).unwrap();
    assert!(table.lookup("Sequence").is_some());

    let halt = table.get(table.lookup("Halt").unwrap());
    let Evaluation::Function { body } = &halt.evaluation else {
        panic!("expected a function");
    };
    let names: Vec<_> = body.children.iter().map(|c| table.resolve(c.name)).collect();
    assert_eq!(table.resolve(body.name), "Sequence");
    assert_eq!(names, ["Stop", "Hold"]);
}

#[test]
fn one_of_and_implied_parameters() {
    let input = indoc! {"
        Builtin Enemies Set
        Builtin Selector Selector
            Parameter Optional Set
        Builtin Coordinates Point
        Builtin Move Action
            Parameter OneOf
                Parameter Location
                Parameter Selector
        Builtin Attack Action
            Parameter Implied Selector
                Selector
    "};

    let table = compile(input).unwrap();
    let slot = &table.get(table.lookup("Move").unwrap()).right[0];
    let SlotKind::OneOf(options) = &slot.kind else {
        panic!("expected one-of");
    };
    assert_eq!(options.len(), 2);
    assert_eq!(slot.accepts, ElementType::LOCATION | ElementType::SELECTOR);

    let slot = &table.get(table.lookup("Attack").unwrap()).right[0];
    assert!(matches!(&slot.kind, SlotKind::Implied(options) if options.len() == 1));
}

#[test]
fn duplicate_declaration() {
    let input = indoc! {"
        Builtin Attack Action
        Builtin Attack Action
    "};

    insta::assert_snapshot!(errors(input), @"error at 30..36: `Attack` is already declared (related: first declared here at 8..14)");
}

#[test]
fn undefined_default() {
    let input = indoc! {"
        Builtin Within_Range Filter
            Parameter Optional Number
                Zero
    "};

    insta::assert_snapshot!(errors(input), @"error at 66..70: `Zero` is not declared");
}

#[test]
fn default_of_wrong_type() {
    let input = indoc! {"
        Builtin Enemies Set
        Builtin Within_Range Filter
            Parameter Optional Number
                Enemies
    "};

    insta::assert_snapshot!(errors(input), @"error at 28..40: template `Enemies` in `Within_Range` produces `Set`, slot expects `Number`");
}

#[test]
fn default_on_required_parameter() {
    let input = indoc! {"
        Builtin Zero Number
        Builtin Within_Range Filter
            Parameter Number
                Zero
    "};

    assert_eq!(kinds(input), [DiagnosticKind::DefaultOnRequired]);
}

#[test]
fn implied_without_element() {
    let input = indoc! {"
        Builtin Attack Action
            Parameter Implied Selector
    "};

    assert_eq!(kinds(input), [DiagnosticKind::MissingImpliedElement]);
}

#[test]
fn unused_argument_is_a_warning() {
    let input = indoc! {"
        Builtin Stop Action
        Function Halt Action
            Parameter n Number
            Stop
    "};

    let (table, diagnostics) = compile_with_diagnostics(input);
    assert!(table.is_some());
    assert!(!diagnostics.has_errors());
    assert_eq!(
        diagnostics.kinds().collect::<Vec<_>>(),
        [DiagnosticKind::UnusedArgument]
    );
}

#[test]
fn function_shape_errors() {
    let input = indoc! {"
        Builtin Stop Action
            Stop
        Function Halt Action Context
            Stop
        Function Idle Action
    "};

    assert_eq!(
        kinds(input),
        [
            DiagnosticKind::BodyInBuiltin,
            DiagnosticKind::ScopeOnFunction,
            DiagnosticKind::MissingBody,
        ]
    );
}

#[test]
fn type_names() {
    let input = indoc! {"
        Builtin Zap Laser
        Builtin Everything Any
        Subtype Point Location
        Subtype Location Point
    "};

    assert_eq!(
        kinds(input),
        [
            DiagnosticKind::InvalidSubtype,
            DiagnosticKind::UnknownType,
            DiagnosticKind::UnknownType,
        ]
    );
}

#[test]
fn coerce_into_undeclared_wrapper() {
    let input = "Coerce Selector Set\n";

    insta::assert_snapshot!(errors(input), @"error at 7..15: `Selector` is not declared");
}

#[test]
fn compile_error_counts_errors() {
    let err = compile("Builtin Zap Laser\n").unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"declarations failed to compile with 1 errors");
}
