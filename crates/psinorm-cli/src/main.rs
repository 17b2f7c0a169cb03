use std::process::ExitCode;

use clap::Parser;
use psinorm_cli::config::{default_config_path, load_config};
use psinorm_cli::logging::init_logging;

mod cli;
mod commands;
mod render;

use crate::cli::{Cli, Command};
use crate::commands::Context;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config =
        load_config(&config_path)?.with_overrides(cli.catalog, cli.output, cli.log_format);
    init_logging(config.log_format)?;

    let ctx = Context { config, config_path };

    match cli.command {
        Command::List => commands::run_list(&ctx),
        Command::Describe { code } => commands::run_describe(&ctx, &code),
        Command::Score(args) => commands::run_score(&ctx, args),
        Command::Replay { path } => commands::run_replay(&ctx, &path),
        Command::Catalog(command) => commands::run_catalog(&ctx, command),
        Command::Config(command) => commands::run_config(&ctx, command),
    }
}
