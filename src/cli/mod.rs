//! CLI module for restkit
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP server
//! - check-config: Validate a configuration file
//! - routes: Print the route table
//! - token: Issue a bearer token for an acting user

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_config, routes, run, run_command, serve, token, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_lines, write_response};
