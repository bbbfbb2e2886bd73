use std::path::Path;

#[test]
fn compiles_an_empty_void_function() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/Empty.jack"),
        include_str!("fixtures/Empty.vm"),
    )
    .unwrap();
}


