use std::path::Path;

#[test]
fn pointing_the_driver_at_a_directory_compiles_every_jack_file_in_it() {
    test_utils::check_directory_compiles_to(
        Path::new("tests/fixtures/multi"),
        &[
            ("One", include_str!("fixtures/multi/One.vm")),
            ("Two", include_str!("fixtures/multi/Two.vm")),
        ],
    )
    .unwrap();
}
