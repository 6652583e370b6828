mod cli;
mod paths;
mod run;

use std::process::ExitCode;

/// Process status for unrecoverable failures; `-1` as seen by the shell.
const FATAL_EXIT: u8 = 255;

fn main() -> ExitCode {
    let cli = cli::parse();
    run::initialise_tracing();

    match run::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::from(FATAL_EXIT)
        }
    }
}
