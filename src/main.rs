use std::{fs, path::PathBuf, process::ExitCode};

use clap::Parser;
use mathpy::get_result;

/// mathpy runs scripts written in a small MATLAB-flavoured language for
/// numeric mathematics.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The script to run; it must have a `.mpy` extension.
    #[arg(num_args = 0..)]
    paths: Vec<PathBuf>,
}

/// Checks the command line and reads the script it names.
///
/// Returns the message to print when the script cannot be run.
fn read_script(args: &Args) -> Result<String, String> {
    let Some(path) = args.paths.first() else {
        return Err("Usage: mathpy <path_to_file>/<filename>.mpy".to_string());
    };

    if path.extension().is_none_or(|ext| ext != "mpy") {
        return Err("File must have a .mpy extension".to_string());
    }
    if args.paths.len() > 1 {
        return Err("Too many arguments".to_string());
    }

    fs::read_to_string(path).map_err(|_| format!("File not found: {}", path.display()))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let script = match read_script(&args) {
        Ok(script) => script,
        Err(message) => {
            println!("{message}");
            return ExitCode::SUCCESS;
        },
    };

    if let Err(e) = get_result(&script) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
