//! cfgtree - query hierarchical configuration documents.

mod cli;

use std::process::ExitCode;

use cfgtree::log;
use clap::{ColorChoice, Parser};
use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    cfgtree::logger::set_verbose(cli.verbose);

    match cli::run::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log!("error"; "{err:#}");
            ExitCode::FAILURE
        }
    }
}
