pub mod ast;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbol_table;
pub mod token;
pub mod vm;

use std::fs;
use std::path::Path;

use error::JackError;

/// Compiles a single `.jack` source string to VM text.
pub fn compile_source(source: &str) -> Result<String, JackError> {
    let class = parser::Parser::new(source).parse_class()?;
    let mut out = Vec::new();
    compiler::compile(&class, &mut out)?;
    Ok(String::from_utf8(out).expect("VM writer only emits ASCII text"))
}

/// Compiles the `.jack` file at `path`, writing `<basename>.vm` next to the
/// process's current working directory.
pub fn compile_file(path: &Path) -> Result<(), JackError> {
    let source = fs::read_to_string(path)?;
    let vm_text = compile_source(&source)?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());

    fs::write(format!("{stem}.vm"), vm_text)?;
    Ok(())
}

/// Resolves `path` to a sorted list of `.jack` files: the file itself if it
/// already names one, or every `.jack`-suffixed regular file in a directory,
/// sorted for deterministic, reproducible builds.
pub fn collect_jack_files(path: &Path) -> Result<Vec<std::path::PathBuf>, JackError> {
    if path.is_dir() {
        let mut files: Vec<_> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_file() && p.extension().map(|e| e == "jack").unwrap_or(false))
            .collect();
        files.sort();
        Ok(files)
    } else if path.extension().map(|e| e == "jack").unwrap_or(false) {
        Ok(vec![path.to_path_buf()])
    } else {
        Ok(Vec::new())
    }
}
