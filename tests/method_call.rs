use std::path::Path;

#[test]
fn method_call_on_a_field_pushes_the_receiver_first() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/MethodCall.jack"),
        include_str!("fixtures/MethodCall.vm"),
    )
    .unwrap();
}
