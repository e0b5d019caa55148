use std::process::ExitCode;

use clap::Parser;

use ebp_lib::cli::Cli;

fn main() -> ExitCode {
    ebp_lib::run(Cli::parse())
}
