#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = tatekumi::app::run() {
        eprintln!("error: {err:#}");
        return ExitCode::from(255);
    }
    ExitCode::SUCCESS
}
