//! Memoir CLI - Question/answer tracking inside a markdown vault

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = memoir_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
