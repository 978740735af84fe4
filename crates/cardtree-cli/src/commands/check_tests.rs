use std::io::Write;

use indoc::indoc;

use super::check::execute;

fn decl_file(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

#[test]
fn demo_declarations_pass() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/rts.decl");
    let report = execute(path.as_ref(), true, false).unwrap();

    assert!(!report.failed);
    assert_eq!(report.output, "");
}

#[test]
fn template_issues_fail() {
    let file = decl_file(indoc! {"
        Builtin Lonely Number
            Parameter Number
        Builtin Holder Number
            Parameter Optional Number
                Lonely
    "});
    let report = execute(file.path(), false, false).unwrap();

    assert!(report.failed);
    insta::assert_snapshot!(report.output, @"error: template `Lonely` in `Holder`: `Lonely` is incomplete");
}

#[test]
fn warnings_fail_only_when_strict() {
    let file = decl_file(indoc! {"
        Builtin One Number
        Function Constant Number
            Parameter unused Number
            One
    "});

    let relaxed = execute(file.path(), false, false).unwrap();
    assert!(!relaxed.failed);
    assert!(relaxed.output.contains("parameter `unused` is never used in the body"));

    let strict = execute(file.path(), true, false).unwrap();
    assert!(strict.failed);
}

#[test]
fn missing_file() {
    let err = execute("does/not/exist.decl".as_ref(), false, false).unwrap_err();
    assert!(err.starts_with("failed to read 'does/not/exist.decl'"));
}
