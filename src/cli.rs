//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Socratic wrong-answer review server
#[derive(Debug, Parser)]
#[command(name = "socratic", version, about)]
pub struct Cli {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand, PartialEq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Bind address, overrides the configured host
        #[arg(long)]
        host: Option<String>,

        /// Listen port, overrides the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Write a default configuration file
    InitConfig {
        /// toml, json or yaml
        #[arg(long, default_value = "toml")]
        format: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// The requested command, `serve` with no overrides when omitted
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve {
            host: None,
            port: None,
        })
    }
}
