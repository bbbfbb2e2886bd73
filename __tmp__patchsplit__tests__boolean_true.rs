use std::path::Path;

#[test]
fn true_constant_lowers_to_push_one_negated() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/BooleanTrue.jack"),
        include_str!("fixtures/BooleanTrue.vm"),
    )
    .unwrap();
}


