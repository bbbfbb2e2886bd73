use std::path::Path;

#[test]
fn if_else_branches_share_the_label_counter_with_while() {
    test_utils::check_compiles_to(
        Path::new("tests/fixtures/IfElseLabels.jack"),
        include_str!("fixtures/IfElseLabels.vm"),
    )
    .unwrap();
}


