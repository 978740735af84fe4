use crate::{
    BuiltinScope, Declaration, ElementType, Evaluation, SEQUENCE, SlotSpec, TableBuilder,
    TableError, Template,
};

fn builtin(b: &mut TableBuilder, name: &str, ty: ElementType) -> Declaration {
    let sym = b.intern(name);
    Declaration::new(sym, ty, Evaluation::Builtin(BuiltinScope::Global))
}

fn selector_table() -> TableBuilder {
    let mut b = TableBuilder::new();
    let enemies = builtin(&mut b, "Enemies", ElementType::SET);
    let selector = builtin(&mut b, "Selector", ElementType::SELECTOR)
        .with_right(SlotSpec::optional(ElementType::SET))
        .with_right(SlotSpec::repeatable(ElementType::FILTER, false));
    b.declare(enemies).unwrap();
    b.declare(selector).unwrap();
    b
}

#[test]
fn lookup_in_declaration_order() {
    let table = selector_table().finish().unwrap();

    let names: Vec<_> = table.iter().map(|(id, _)| table.name(id)).collect();
    assert_eq!(names, ["Enemies", "Selector"]);

    let id = table.lookup("Selector").unwrap();
    assert_eq!(table.get(id).ty, ElementType::SELECTOR);
    assert_eq!(table.get(id).right.len(), 2);
    assert!(table.lookup("Allies").is_none());
}

#[test]
fn duplicate_declaration_rejected() {
    let mut b = selector_table();
    let again = builtin(&mut b, "Enemies", ElementType::SET);

    let err = b.declare(again).unwrap_err();
    assert_eq!(err, TableError::DuplicateDeclaration("Enemies".into()));
}

#[test]
fn union_type_rejected_for_own_type() {
    let mut b = TableBuilder::new();
    let decl = builtin(&mut b, "Blob", ElementType::SET | ElementType::FILTER);

    let err = b.declare(decl).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"`Blob` must produce exactly one element type, found `Set | Filter`");
}

#[test]
fn coercion_registered_with_wrapper_type() {
    let mut b = selector_table();
    b.coerce("Selector", ElementType::SET);
    let table = b.finish().unwrap();

    let wrapper = table
        .registry()
        .implied_wrapper_for(ElementType::SET, ElementType::SELECTOR)
        .unwrap();
    assert_eq!(table.resolve(wrapper), "Selector");
}

#[test]
fn coercion_needs_accepting_slot() {
    let mut b = selector_table();
    b.coerce("Selector", ElementType::NUMBER);

    let err = b.finish().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"coercion wrapper `Selector` has no slot accepting `Number`");
}

#[test]
fn coercion_to_unknown_wrapper() {
    let mut b = selector_table();
    b.coerce("Location", ElementType::POINT);

    let err = b.finish().unwrap_err();
    assert_eq!(err, TableError::UnknownElement("Location".into()));
}

#[test]
fn default_template_type_checked() {
    let mut b = selector_table();
    let enemies = b.intern("Enemies");
    let decl = builtin(&mut b, "Within_Range", ElementType::FILTER)
        .with_right(SlotSpec::optional(ElementType::NUMBER).with_default(Template::leaf(enemies)));
    b.declare(decl).unwrap();

    let err = b.finish().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"template `Enemies` in `Within_Range` produces `Set`, slot expects `Number`");
}

#[test]
fn body_template_names_checked() {
    let mut b = TableBuilder::new();
    let missing = b.intern("Nowhere");
    let sym = b.intern("Go");
    let decl = Declaration::new(
        sym,
        ElementType::ACTION,
        Evaluation::Function {
            body: Template::leaf(missing),
        },
    );
    b.declare(decl).unwrap();

    let err = b.finish().unwrap_err();
    assert_eq!(err, TableError::UnknownElement("Nowhere".into()));
}

#[test]
fn sequence_declared_once() {
    let mut b = TableBuilder::new();
    let first = b.sequence();
    let second = b.sequence();
    assert_eq!(first, second);

    let table = b.finish().unwrap();
    let id = table.lookup(SEQUENCE).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(id).evaluation, Evaluation::Sequence);
    assert_eq!(table.get(id).right[0].accepts, ElementType::all());
}

#[test]
fn empty_one_of_rejected() {
    let mut b = TableBuilder::new();
    let decl = builtin(&mut b, "Pick", ElementType::ACTION).with_right(SlotSpec::one_of(vec![], true));
    b.declare(decl).unwrap();

    let err = b.finish().unwrap_err();
    assert_eq!(err, TableError::EmptyOneOf("Pick".into()));
}
