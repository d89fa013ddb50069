use clap::{Parser, Subcommand};

/// Command-line interface definition for rTimeClock
/// Telegram time-clock bot that logs worked hours to a monthly spreadsheet
#[derive(Parser)]
#[command(
    name = "rtimeclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "A Telegram time-clock bot: clock in, clock out, and log worked hours to a spreadsheet",
    long_about = None
)]
pub struct Cli {
    /// Override configuration file path (useful for tests or multiple bots)
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file (and the local CSV workbook, if selected)
    Init,

    /// Manage the configuration file (view or edit)
    #[command(name = "config")]
    Config {
        #[arg(long = "print", help = "Print the effective configuration (secrets masked)")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Run the webhook server
    Serve {
        /// Listen port (overrides config and $PORT)
        #[arg(long, short)]
        port: Option<u16>,

        /// Register `webhook_url` with Telegram before listening
        #[arg(long)]
        register: bool,
    },

    /// Register or remove the Telegram webhook
    Webhook {
        /// Register the webhook URL
        #[arg(long, conflicts_with = "delete")]
        set: bool,

        /// Remove the webhook
        #[arg(long, conflicts_with = "set")]
        delete: bool,

        /// URL to register (defaults to `webhook_url` from the config)
        #[arg(long, requires = "set")]
        url: Option<String>,
    },
}
