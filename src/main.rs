use std::path::PathBuf;

use clap::Parser as ClapParser;
use log::{error, info};

use jackc::collect_jack_files;

#[derive(ClapParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// A `.jack` file or a directory of `.jack` files to compile.
    path: PathBuf,

    /// Raise the log level from warnings-only to debug output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Cli::parse();

    let level = if args.verbose {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    simple_logger::init_with_level(level).expect("failed to initialize logger");

    let files = match collect_jack_files(&args.path) {
        Ok(files) => files,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    if files.is_empty() {
        error!(
            "'{}' is neither a .jack file nor a directory containing any",
            args.path.to_string_lossy()
        );
        std::process::exit(1);
    }

    for file in &files {
        if let Err(err) = jackc::compile_file(file) {
            error!("{} ({})", err, file.to_string_lossy());
            std::process::exit(1);
        }
    }

    info!("compiled {} file(s)", files.len());
}
