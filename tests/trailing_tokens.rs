use std::path::Path;

#[test]
fn a_second_class_declaration_after_the_first_closes_fails_to_compile() {
    test_utils::check_fails_to_compile(Path::new("tests/fixtures/TrailingGarbage.jack")).unwrap();
}
