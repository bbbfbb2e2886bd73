use std::path::Path;

#[test]
fn a_small_class_with_fields_constructor_and_methods_compiles_whole() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/Counter.jack"),
        include_str!("fixtures/Counter.vm"),
    )
    .unwrap();
}
