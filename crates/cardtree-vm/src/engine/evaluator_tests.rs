use indoc::indoc;

use cardtree_core::DeclarationTable;
use cardtree_lib::{Session, SessionConfig, Token};

use crate::{Args, Bindings, EvalError, Evaluator, FuelLimits, Result, Value};

const RTS: &str = include_str!("../../../../demos/rts.decl");

const DIGITS: [&str; 10] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

struct Game {
    selection: Value,
    /// Actors visible to each `Selector` call.
    seen: Vec<Option<Value>>,
}

fn record<const N: usize>(fields: [(&str, Value); N]) -> Value {
    Value::Record(fields.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
}

fn digit(d: i64) -> impl Fn(&Args) -> Result<Value> {
    move |args| Ok(Value::Number(args.opt::<i64>(0)?.unwrap_or(0) * 10 + d))
}

fn rts() -> Bindings<Game> {
    let mut bindings = Bindings::<Game>::new()
        .global("Command", |args| args.get(0))
        .context("Attack", |_cx, args| {
            Ok(record([
                ("action", "attack".into()),
                ("actors", args.get(0)?),
                ("target", args.get(1)?),
            ]))
        })
        .context("Move", |_cx, args| {
            Ok(record([
                ("action", "move".into()),
                ("actors", args.get(0)?),
                ("destination", args.get(1)?),
            ]))
        })
        .context("Selector", |cx, args| {
            let actors = cx.actors().cloned();
            cx.state.seen.push(actors);
            Ok(record([("set", args.get(0)?), ("filters", args.get(1)?)]))
        })
        .context("Enemies", |_cx, _args| Ok("enemies".into()))
        .context("Allies", |_cx, _args| Ok("allies".into()))
        .context("Current_Selection", |cx, _args| Ok(cx.state.selection.clone()))
        .global("Within_Range", |args| Ok(record([("range", args.get(0)?)])))
        .global("Coordinates", |args| Ok(record([("x", args.get(0)?), ("y", args.get(1)?)])))
        .global("Multiply", |args| {
            Ok(Value::Number(args.get::<i64>(0)? * args.get::<i64>(1)?))
        });
    for (d, name) in DIGITS.iter().enumerate() {
        bindings = bindings.global(name, digit(d as i64));
    }
    bindings
}

fn game() -> Game {
    Game {
        selection: "selected".into(),
        seen: Vec::new(),
    }
}

fn build<'t>(table: &'t DeclarationTable, root: &str, tokens: &str) -> Session<'t> {
    let mut session = Session::new(table, SessionConfig::default().with_root(root)).unwrap();
    for token in tokens.split_whitespace() {
        session.apply(&Token::parse(token)).unwrap();
    }
    session
}

fn json(value: &Value) -> String {
    serde_json::to_string(value).unwrap()
}

#[test]
fn actors_default_and_implied_selector() {
    let table = cardtree_compiler::compile(RTS).unwrap();
    let session = build(&table, "Command", "Attack Enemies Within_Range");
    let bindings = rts();
    let mut state = game();

    let value = Evaluator::new(&bindings).evaluate(session.tree(), &mut state).unwrap();

    insta::assert_snapshot!(json(&value), @r#"[{"action":"attack","actors":"selected","target":{"set":"enemies","filters":[{"range":0}]}}]"#);
    assert_eq!(state.seen, [Some(Value::from("selected"))]);
}

#[test]
fn digits_concatenate_through_left_argument() {
    let table = cardtree_compiler::compile(RTS).unwrap();
    let session = build(&table, "Command", "Move Coordinates One Two :skip Three");
    let bindings = rts();

    let value = Evaluator::new(&bindings).evaluate(session.tree(), &mut game()).unwrap();

    insta::assert_snapshot!(json(&value), @r#"[{"action":"move","actors":"selected","destination":{"x":12,"y":3}}]"#);
}

#[test]
fn function_body_reads_its_argument() {
    let table = cardtree_compiler::compile(RTS).unwrap();
    let session = build(&table, "Command", "Move Coordinates Double Four :skip :skip Five");
    let bindings = rts();

    let value = Evaluator::new(&bindings).evaluate(session.tree(), &mut game()).unwrap();

    let destination = value.evaluate_as::<Vec<Value>>().unwrap()[0].field("destination").cloned();
    assert_eq!(destination, Some(record([("x", Value::Number(8)), ("y", Value::Number(5))])));
}

#[test]
fn actor_stack_unwinds_on_error() {
    let table = cardtree_compiler::compile(RTS).unwrap();
    let session = build(&table, "Command", "Attack Enemies Within_Range");
    let bindings = rts().global("Within_Range", |_args| Err(EvalError::builtin("out of range")));
    let mut evaluator = Evaluator::new(&bindings);

    let err = evaluator.evaluate(session.tree(), &mut game()).unwrap_err();

    assert_eq!(err, EvalError::builtin("out of range"));
    assert_eq!(evaluator.actor_depth(), 0);
}

#[test]
fn incomplete_tree_is_not_evaluated() {
    let table = cardtree_compiler::compile(RTS).unwrap();
    let session = build(&table, "Command", "Attack");
    let bindings = rts();

    let err = Evaluator::new(&bindings).evaluate(session.tree(), &mut game()).unwrap_err();

    assert_eq!(err, EvalError::Incomplete("Command".to_owned()));
}

#[test]
fn scope_must_match_declaration() {
    let table = cardtree_compiler::compile(RTS).unwrap();
    let session = build(&table, "Command", "Attack Enemies");
    let bindings = rts().global("Enemies", |_args| Ok("enemies".into()));

    let err = Evaluator::new(&bindings).evaluate(session.tree(), &mut game()).unwrap_err();

    assert_eq!(err, EvalError::ScopeMismatch("Enemies".to_owned()));
}

#[test]
fn fuel_bounds_evaluation() {
    let table = cardtree_compiler::compile(RTS).unwrap();
    let session = build(&table, "Command", "Attack Enemies Within_Range");
    let bindings = rts();

    let err = Evaluator::new(&bindings)
        .with_limits(FuelLimits::new().exec_fuel(3))
        .evaluate(session.tree(), &mut game())
        .unwrap_err();

    assert_eq!(err, EvalError::ExecFuelExhausted(3));
}

#[test]
fn recursion_limit() {
    let table = cardtree_compiler::compile(indoc! {"
        Function Loop Number
            Loop
    "})
    .unwrap();
    let session = build(&table, "Loop", "");
    let bindings = Bindings::<()>::new();

    let err = Evaluator::new(&bindings)
        .with_limits(FuelLimits::new().recursion_limit(8))
        .evaluate(session.tree(), &mut ())
        .unwrap_err();

    assert_eq!(err, EvalError::RecursionLimitExceeded(8));
    insta::assert_snapshot!(err.to_string(), @"recursion limit of 8 exceeded");
}

#[test]
fn sequence_yields_last_body() {
    let table = cardtree_compiler::compile(indoc! {"
        Builtin One Number
        Builtin Two Number
        Function Both Number
            One
            Two
    "})
    .unwrap();
    let session = build(&table, "Both", "");
    let bindings = Bindings::<()>::new()
        .global("One", |_args| Ok(Value::Number(1)))
        .global("Two", |_args| Ok(Value::Number(2)));

    let value = Evaluator::new(&bindings).evaluate(session.tree(), &mut ()).unwrap();

    assert_eq!(value, Value::Number(2));
}

#[test]
fn unbound_builtins() {
    let table = cardtree_compiler::compile(indoc! {"
        Builtin Command Command
            Parameter Repeatable Action
        Builtin Stop Action
        Builtin Scan Action Context
    "})
    .unwrap();
    let bindings = Bindings::<()>::new()
        .global("Command", |args| args.get(0))
        .global("Scan", |_args| Ok(Value::Null));

    assert_eq!(bindings.unbound(&table), ["Stop", "Scan"]);

    let session = build(&table, "Command", "Stop");
    let err = Evaluator::new(&bindings).evaluate(session.tree(), &mut ()).unwrap_err();
    assert_eq!(err, EvalError::UnboundBuiltin("Stop".to_owned()));
}

const SELECT: &str = indoc! {"
    Builtin Command Command
        Parameter Repeatable Action
    Builtin Select Action
        Parameter group Implied Selector
            Selector
    Builtin Selector Selector
        Parameter Optional Set
            Allies
    Builtin Allies Set
    Builtin Enemies Set
"};

fn select_bindings() -> Bindings<()> {
    Bindings::<()>::new()
        .global("Command", |args| args.get(0))
        .global("Select", |args| {
            let group = args.opt::<Value>(0)?.unwrap_or_else(|| "missing".into());
            Ok(record([("group", group)]))
        })
        .global("Selector", |args| Ok(record([("set", args.get(0)?)])))
        .global("Allies", |_args| Ok("allies".into()))
        .global("Enemies", |_args| Ok("enemies".into()))
}

#[test]
fn unchosen_implied_slot_evaluates_its_option() {
    let table = cardtree_compiler::compile(SELECT).unwrap();
    let session = build(&table, "Command", "Select");
    let bindings = select_bindings();

    let value = Evaluator::new(&bindings).evaluate(session.tree(), &mut ()).unwrap();

    insta::assert_snapshot!(json(&value), @r#"[{"group":{"set":"allies"}}]"#);
}

#[test]
fn chosen_implied_option_holds_the_token() {
    let table = cardtree_compiler::compile(SELECT).unwrap();
    let session = build(&table, "Command", "Select Enemies");
    let bindings = select_bindings();

    let value = Evaluator::new(&bindings).evaluate(session.tree(), &mut ()).unwrap();

    insta::assert_snapshot!(json(&value), @r#"[{"group":{"set":"enemies"}}]"#);
}
