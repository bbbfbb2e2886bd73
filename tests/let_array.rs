use std::path::Path;

#[test]
fn array_assignment_evaluates_rhs_before_the_index() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/LetArray.jack"),
        include_str!("fixtures/LetArray.vm"),
    )
    .unwrap();
}
