//! structsync CLI: the `structsync` command.

mod cli;
mod commands;
mod config;
mod logging;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use logging::Verbosity;

fn main() {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.debug, cli.quiet, cli.silent));
    let config = support::load_config_or_exit(cli.config.as_deref());

    match cli.command {
        Commands::Changes {
            paths,
            listing,
            env,
            json,
        } => commands::changes::run(
            commands::changes::Args {
                paths,
                listing,
                env,
                json,
            },
            &config,
        ),

        Commands::Hash { file, json } => commands::hash::run(file, json),

        Commands::Identity { file, org_id, json } => {
            commands::identity::run(file, org_id, json, &config)
        }
    }
}
