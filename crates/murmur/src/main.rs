// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Murmur - a WhatsApp relay that answers messages with Gemini.
//!
//! This is the binary entry point.

mod check;
mod history;
mod serve;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use murmur_config::model::MurmurConfig;

/// Murmur - a WhatsApp relay that answers messages with Gemini.
#[derive(Parser, Debug)]
#[command(name = "murmur", version, about, long_about = None)]
struct Cli {
    /// Load this file instead of searching the standard config locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Start the webhook server (default).
    Serve,
    /// Inspect the configuration.
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
    /// Print the stored conversation for a sender.
    History {
        /// Sender identifier as it appears in webhooks, e.g. 5511999998888@s.whatsapp.net.
        sender: String,
        /// Output raw JSON.
        #[arg(long)]
        json: bool,
    },
    /// Query a running server's health endpoint.
    Status {
        /// Output structured JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug, PartialEq)]
enum ConfigCommands {
    /// Load and validate the configuration, then print a summary.
    Check,
}

fn load_config(path: Option<&std::path::Path>) -> MurmurConfig {
    let loaded = match path {
        Some(path) => murmur_config::load_and_validate_path(path),
        None => murmur_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            murmur_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Config {
            action: ConfigCommands::Check,
        } => match check::run_config_check(&config).await {
            Ok(true) => Ok(()),
            Ok(false) => std::process::exit(1),
            Err(e) => Err(e),
        },
        Commands::History { sender, json } => history::run_history(&config, &sender, json).await,
        Commands::Status { json } => status::run_status(&config, json).await,
    };

    if let Err(e) = result {
        eprintln!("murmur: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["murmur"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_check_parses() {
        let cli = Cli::try_parse_from(["murmur", "config", "check"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Check
            })
        );
    }

    #[test]
    fn history_takes_sender_and_global_config() {
        let cli = Cli::try_parse_from([
            "murmur",
            "history",
            "5511999998888@s.whatsapp.net",
            "--json",
            "--config",
            "/tmp/murmur.toml",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::History {
                sender: "5511999998888@s.whatsapp.net".to_string(),
                json: true,
            })
        );
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/murmur.toml")));
    }

    #[test]
    fn history_requires_sender() {
        assert!(Cli::try_parse_from(["murmur", "history"]).is_err());
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config =
            murmur_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.agent.name, "murmur");
    }
}
