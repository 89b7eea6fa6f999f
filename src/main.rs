mod cli;
mod commands;
mod config;
mod convert;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Decode(args) => commands::decode(args),
        Command::Encode(args) => commands::encode(args),
        Command::Add(args) => commands::add(args),
        Command::Diff(args) => commands::diff(args),
        Command::Next(args) => commands::next(args),
        Command::Eras(args) => commands::eras(args),
    }
}
