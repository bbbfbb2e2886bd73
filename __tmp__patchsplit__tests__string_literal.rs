use std::path::Path;

#[test]
fn string_literals_unroll_into_string_new_and_append_char() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/StringLiteral.jack"),
        include_str!("fixtures/StringLiteral.vm"),
    )
    .unwrap();
}


