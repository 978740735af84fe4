use indoc::indoc;

use cardtree_core::ElementType;

use crate::{BuildError, SlotAddr};
use crate::test_utils::{ATTACK, RTS, compile, dump, feed, session};

#[test]
fn set_becomes_implied_selector() {
    let table = compile(ATTACK);
    let mut session = session(&table, "Command");

    feed(&mut session, "Attack Enemies Within_Range");

    insta::assert_snapshot!(dump(&session), @r"
    Command
        Attack
            Selector (implied)
                Enemies
                Within_Range
                    (Zero)
    ");
    assert!(session.allowed().complete);
}

#[test]
fn unmet_required_slot_blocks_later_tokens() {
    let table = compile(ATTACK);
    let mut session = session(&table, "Command");
    feed(&mut session, "Attack");

    let err = session.append("Zero").unwrap_err();

    assert_eq!(
        err,
        BuildError::UnmetPrecedingParameter {
            element: "Attack".to_owned()
        }
    );
    insta::assert_snapshot!(dump(&session), @r"
    Command
        Attack
    ");
}

#[test]
fn token_without_slot_is_a_type_mismatch() {
    let table = compile(ATTACK);
    let mut session = session(&table, "Command");
    feed(&mut session, "Attack Enemies");
    let before = dump(&session);

    let err = session.append("Zero").unwrap_err();

    assert_eq!(
        err,
        BuildError::TypeMismatch {
            element: "Zero".to_owned(),
            ty: ElementType::NUMBER
        }
    );
    insta::assert_snapshot!(err.to_string(), @"no open slot accepts `Zero` (Number)");
    assert_eq!(dump(&session), before);
}

#[test]
fn unknown_element() {
    let table = compile(ATTACK);
    let mut session = session(&table, "Command");

    let err = session.append("Retreat").unwrap_err();

    assert_eq!(err, BuildError::DeclarationNotFound("Retreat".to_owned()));
}

pub(crate) const PAIR: &str = indoc! {"
    Builtin Pair Command
        Parameter Number
        Parameter Number
    Builtin A Number
        LeftParameter Optional Number
    Builtin B Number
        LeftParameter Optional Number
"};

#[test]
fn skip_moves_to_second_slot() {
    let table = compile(PAIR);
    let mut session = session(&table, "Pair");

    feed(&mut session, "A :skip B");

    insta::assert_snapshot!(dump(&session), @r"
    Pair
        A
        B
    ");
}

#[test]
fn without_skip_left_splice_wins() {
    let table = compile(PAIR);
    let mut session = session(&table, "Pair");

    feed(&mut session, "A B");

    insta::assert_snapshot!(dump(&session), @r"
    Pair
        B
            < A
    ");
}

#[test]
fn digits_and_skip() {
    let table = compile(RTS);
    let mut session = session(&table, "Command");

    feed(&mut session, "Move Coordinates One Two :skip Three");

    insta::assert_snapshot!(dump(&session), @r"
    Command
        Move
            < (Current_Selection)
            Coordinates
                Two
                    < One
                Three
    ");
}

#[test]
fn one_of_chooses_by_first_argument() {
    let table = compile(RTS);
    let mut session = session(&table, "Command");

    feed(&mut session, "Move Enemies");

    insta::assert_snapshot!(dump(&session), @r"
    Command
        Move
            < (Current_Selection)
            Selector (implied)
                Enemies
    ");
    let tree = session.tree();
    let command = tree.node(session.root());
    let r#move = tree.node(command.right()[0].children()[0]);
    assert_eq!(r#move.right()[0].chosen(), Some(1));
}

#[test]
fn required_left_only_through_splice() {
    let table = compile(RTS);
    let mut session = session(&table, "Command");
    feed(&mut session, "Attack Enemies Within_Range");

    assert!(matches!(
        session.append("Add"),
        Err(BuildError::TypeMismatch { .. })
    ));

    feed(&mut session, "Five Add Two");

    insta::assert_snapshot!(dump(&session), @r"
    Command
        Attack
            < (Current_Selection)
            Selector (implied)
                Enemies
                Within_Range
                    Add
                        < Five
                        Two
    ");
}

#[test]
fn permutable_slots_fill_in_any_order() {
    let table = compile(RTS);
    let mut session = session(&table, "Command");

    feed(&mut session, "Attack Enemies Closest Within_Range");

    insta::assert_snapshot!(dump(&session), @r"
    Command
        Attack
            < (Current_Selection)
            Selector (implied)
                Enemies
                Within_Range
                    (Zero)
                Closest
    ");
}

pub(crate) const PATROL: &str = indoc! {"
    Subtype Point Location
    Builtin Command Command
        Parameter Repeatable Action
    Builtin Patrol Action
        Parameter route Implied Location
            Waypoint
            Coordinates
    Builtin Waypoint Point
        Parameter Direction
    Builtin Coordinates Point
        Parameter Number
        Parameter Number
    Builtin North Direction
    Builtin One Number
    Builtin Two Number
"};

#[test]
fn implied_options_hidden_until_chosen() {
    let table = compile(PATROL);
    let mut session = session(&table, "Command");

    feed(&mut session, "Patrol");

    insta::assert_snapshot!(dump(&session), @r"
    Command
        Patrol
    ");
    assert!(!session.allowed().complete);
}

#[test]
fn implied_option_taking_the_token_is_chosen() {
    let table = compile(PATROL);

    let mut first = session(&table, "Command");
    feed(&mut first, "Patrol North");
    insta::assert_snapshot!(dump(&first), @r"
    Command
        Patrol
            Waypoint (implied)
                North
    ");

    let mut second = session(&table, "Command");
    feed(&mut second, "Patrol One Two");
    insta::assert_snapshot!(dump(&second), @r"
    Command
        Patrol
            Coordinates (implied)
                One
                Two
    ");
    assert!(second.allowed().complete);
}

pub(crate) const SELECT: &str = indoc! {"
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

#[test]
fn complete_option_stands_in_for_unchosen_slot() {
    let table = compile(SELECT);
    let mut session = session(&table, "Command");
    feed(&mut session, "Select");

    let tree = session.tree();
    let select = tree.node(session.root()).right()[0].children()[0];
    let group = SlotAddr::right(select, 0);

    assert_eq!(tree.slot(group).chosen(), None);
    assert!(tree.slot_satisfied(group));
    assert_eq!(tree.name(tree.slot_value(group)[0]), "Selector");
    assert!(session.allowed().complete);

    feed(&mut session, "Enemies");
    insta::assert_snapshot!(dump(&session), @r"
    Command
        Select
            Selector (implied)
                Enemies
    ");
}
