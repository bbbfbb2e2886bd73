use std::path::Path;

#[test]
fn expressions_evaluate_left_to_right_with_no_precedence() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/Precedence.jack"),
        include_str!("fixtures/Precedence.vm"),
    )
    .unwrap();
}


