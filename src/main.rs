//! `vmpull` binary entry point.

use std::process;

use clap::Parser;

use vmpull::styling;

mod cli;
mod commands;

use cli::{Cli, Command};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => commands::handle_run(&args),
        Command::Branches => commands::handle_branches(),
        Command::Roles => commands::handle_roles(),
        Command::Config { action } => commands::handle_config(&action),
    };

    if let Err(err) = result {
        styling::eprintln!("{}", styling::error_message(format!("{err:#}")));
        process::exit(1);
    }
}
