use std::path::Path;

#[test]
fn call_on_an_unresolved_name_is_a_static_call() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/StaticCall.jack"),
        include_str!("fixtures/StaticCall.vm"),
    )
    .unwrap();
}
