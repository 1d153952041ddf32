use epoxy::config::Config;
use epoxy::driver;
use epoxy::error::EpoxyError;

use tracing_subscriber::{EnvFilter, fmt};

use std::fs;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "usage: epoxy [--emit] <file.epx>";

fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env();
    let mut file = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--emit" => config.emit = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            _ if file.is_none() => file = Some(arg),
            _ => {
                eprintln!("{USAGE}");
                return ExitCode::FAILURE;
            }
        }
    }

    let Some(file) = file else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    if Path::new(&file).extension().is_none_or(|ext| ext != "epx") {
        eprintln!("Only .epx files allowed");
        return ExitCode::FAILURE;
    }

    let contents = match fs::read_to_string(&file) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("could not read `{file}`: {e}");
            return ExitCode::FAILURE;
        }
    };

    match driver::run(&contents, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(EpoxyError::Compile(error)) => {
            if error.eprint(&file, &contents).is_err() {
                eprintln!("{error}");
            }
            ExitCode::FAILURE
        }
        Err(EpoxyError::Failed(status)) => status
            .code()
            .and_then(|code| u8::try_from(code).ok())
            .map_or(ExitCode::FAILURE, ExitCode::from),
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
