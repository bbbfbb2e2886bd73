use std::path::Path;

#[test]
fn referencing_an_undeclared_identifier_fails_to_compile() {
    test_utils::check_fails_to_compile(Path::new("tests/fixtures/Undefined.jack")).unwrap();
}

