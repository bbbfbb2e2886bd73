use std::path::Path;

#[test]
fn constructor_allocates_and_returns_this() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/TwoFields.jack"),
        include_str!("fixtures/TwoFields.vm"),
    )
    .unwrap();
}


