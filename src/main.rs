//! `instmon` binary entry point.
use std::process::ExitCode;

use instmon_cli::commands;
use instmon_cli::logging;
use instmon_cli::platform::Host;

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let argv = match commands::collect_args(std::env::args_os()) {
        Ok(argv) => argv,
        Err(err) => {
            logging::fatal(&err.into());
            return ExitCode::FAILURE;
        }
    };
    let mut stdout = std::io::stdout().lock();

    // Failures have already been logged by the dispatcher.
    match commands::run(argv, &Host, &mut stdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
