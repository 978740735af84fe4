use crate::ElementType;

#[test]
fn parse_known_names() {
    assert_eq!(ElementType::parse("Group_Size"), Some(ElementType::GROUP_SIZE));
    assert_eq!(ElementType::parse("Number"), Some(ElementType::NUMBER));
    assert_eq!(ElementType::parse("Any"), Some(ElementType::all()));
    assert_eq!(ElementType::parse("number"), None);
    assert_eq!(ElementType::parse("Widget"), None);
}

#[test]
fn display_single_and_union() {
    insta::assert_snapshot!(ElementType::SELECTOR.to_string(), @"Selector");
    insta::assert_snapshot!(
        (ElementType::POINT | ElementType::LINE | ElementType::AREA).to_string(),
        @"Point | Line | Area"
    );
    insta::assert_snapshot!(ElementType::all().to_string(), @"Any");
    insta::assert_snapshot!(ElementType::empty().to_string(), @"Nothing");
}

#[test]
fn single_flag_detection() {
    assert!(ElementType::SET.is_single());
    assert!(!(ElementType::SET | ElementType::FILTER).is_single());
    assert!(!ElementType::empty().is_single());
}
