//! CLI argument definitions for `keepwatch`.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the CLI argument parser and command definitions.
pub fn build_cli() -> Command {
    // Build the CLI definition in one place to keep main.rs slim.
    Command::new("keepwatch")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Adam Howard <adam.thomas.howard@gmail.com>")
        .about("A stopwatch that remembers where it left off")
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .global(true)
                .help("Directory holding stopwatch.json (defaults to the app data directory)"),
        )
        .arg(
            Arg::new("autosave-ms")
                .long("autosave-ms")
                .value_name("MS")
                .default_value("5000")
                .value_parser(value_parser!(u64).range(1..))
                .help("Interval between autosaves"),
        )
        .arg(
            Arg::new("refresh-ms")
                .long("refresh-ms")
                .value_name("MS")
                .default_value("100")
                .value_parser(value_parser!(u64).range(1..))
                .help("Display refresh interval"),
        )
        .subcommand(
            Command::new("status")
                .about("Print the saved elapsed time and exit")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the saved record as JSON"),
                ),
        )
        .subcommand(Command::new("reset").about("Overwrite the saved elapsed time with zero"))
        .subcommand(Command::new("path").about("Print the location of the saved record"))
}
