//! # Keepwatch
//!
//! A terminal stopwatch whose elapsed time survives restarts.

use std::io::Write;

use log::error;

mod cli;
mod controls;
mod logging;
mod runner;
mod ui;
mod window;

fn main() {
    dotenv::dotenv().ok();
    let args = cli::args::build_cli().get_matches();
    // Subcommands print to the console, so their log lines go to stderr too.
    let log_buffer = logging::init(args.subcommand().is_some());

    let code = match runner::run(&args, log_buffer) {
        Ok(code) => code,
        Err(err) => {
            let message = err.to_string().to_lowercase();
            error!("{}", message);
            let _ = writeln!(std::io::stderr(), "keepwatch: {}", message);
            -1
        }
    };

    std::process::exit(code)
}
