mod cli;

use crate::cli::Cli;

fn main() {
    // Parse CLI, initialize logging and dispatch.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("tvs error: {:#}", err);
        std::process::exit(1);
    }
}
