//! CLI argument definitions using clap
//!
//! Commands:
//! - restkit serve [--config <path>] [--port <port>]
//! - restkit check-config --config <path>
//! - restkit routes
//! - restkit token --config <path> --user <name>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// restkit - CRUD REST resources with filtering and pagination
#[derive(Parser, Debug)]
#[command(name = "restkit")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file; built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate a configuration file, then exit
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./restkit.json")]
        config: PathBuf,
    },

    /// Print every route the server answers
    Routes,

    /// Issue a bearer token naming the acting user
    Token {
        /// Path to configuration file
        #[arg(long, default_value = "./restkit.json")]
        config: PathBuf,

        /// Username to put in the token subject
        #[arg(long)]
        user: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
