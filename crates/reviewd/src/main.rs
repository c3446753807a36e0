use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match reviewd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(io::stderr(), "reviewd: {error}");
            ExitCode::FAILURE
        }
    }
}
