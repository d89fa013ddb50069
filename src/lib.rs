//! rTimeClock library root.
//! Exposes the CLI parser, the high-level run() function, and the bot modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod logging;
pub mod models;
pub mod server;
pub mod sheets;
pub mod telegram;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub async fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let path = Config::resolve_path(cli.config.as_deref());
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg, &path),
        Commands::Serve { .. } => cli::commands::serve::handle(&cli.command, cfg, &path).await,
        Commands::Webhook { .. } => cli::commands::webhook::handle(&cli.command, cfg).await,
    }
}

/// Entry point used by main.rs
pub async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init();

    // config + environment overrides, loaded once
    let cfg = Config::load(cli.config.as_deref())?;

    dispatch(&cli, &cfg).await
}
