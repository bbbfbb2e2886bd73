use std::{
    error::Error,
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Output},
};

const JACKC_PATH: &str = "./target/debug/jackc";

fn run_compiler(src_path: &Path, cwd: &Path) -> Result<Output, io::Error> {
    Command::new(JACKC_PATH)
        .arg(src_path)
        .current_dir(cwd)
        .output()
}

/// Compiles `src_path` (an absolute or cwd-relative path to a `.jack`
/// fixture) in a scratch directory and asserts the produced `<Stem>.vm`
/// text matches `expected` exactly.
pub fn check_compiles_to(src_path: &Path, expected: &str) -> Result<(), Box<dyn Error>> {
    let src_path = fs::canonicalize(src_path)?;
    let stem = src_path
        .file_stem()
        .ok_or("fixture path has no file stem")?
        .to_string_lossy()
        .to_string();

    let cwd = std::env::temp_dir().join(format!("jackc-test-{stem}-{}", std::process::id()));
    fs::create_dir_all(&cwd)?;

    let output = run_compiler(&src_path, &cwd)?;
    let stderr = std::str::from_utf8(&output.stderr)?;

    assert!(
        output.status.success(),
        "jackc exited with status {:?}: {stderr}",
        output.status.code()
    );

    let vm_path = cwd.join(format!("{stem}.vm"));
    let produced = fs::read_to_string(&vm_path)?;

    assert_eq!(produced, expected);

    let _ = fs::remove_dir_all(&cwd);
    Ok(())
}

/// Compiles every `.jack` file in `src_dir` by invoking the binary once with
/// the directory path, then asserts each `(stem, expected)` pair in
/// `expected_by_stem` matches the produced `<stem>.vm` exactly.
pub fn check_directory_compiles_to(
    src_dir: &Path,
    expected_by_stem: &[(&str, &str)],
) -> Result<(), Box<dyn Error>> {
    let src_dir = fs::canonicalize(src_dir)?;
    let cwd = std::env::temp_dir().join(format!(
        "jackc-test-dir-{}-{}",
        src_dir.file_name().unwrap().to_string_lossy(),
        std::process::id()
    ));
    fs::create_dir_all(&cwd)?;

    let output = run_compiler(&src_dir, &cwd)?;
    let stderr = std::str::from_utf8(&output.stderr)?;

    assert!(
        output.status.success(),
        "jackc exited with status {:?}: {stderr}",
        output.status.code()
    );

    for (stem, expected) in expected_by_stem {
        let produced = fs::read_to_string(cwd.join(format!("{stem}.vm")))?;
        assert_eq!(&produced, expected);
    }

    let _ = fs::remove_dir_all(&cwd);
    Ok(())
}

/// Asserts that compiling `src_path` fails with a non-zero exit status.
pub fn check_fails_to_compile(src_path: &Path) -> Result<(), Box<dyn Error>> {
    let src_path = fs::canonicalize(src_path)?;
    let cwd: PathBuf = std::env::temp_dir().join(format!(
        "jackc-test-fail-{}-{}",
        src_path.file_stem().unwrap().to_string_lossy(),
        std::process::id()
    ));
    fs::create_dir_all(&cwd)?;

    let output = run_compiler(&src_path, &cwd)?;
    let _ = fs::remove_dir_all(&cwd);

    assert!(
        !output.status.success(),
        "jackc should have failed to compile {}",
        src_path.to_string_lossy()
    );
    Ok(())
}


