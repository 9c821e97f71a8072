//! CLI module for the account gateway
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API

pub mod serve;

use clap::{Parser, Subcommand};

/// Account Gateway - sign-up validation and login service
#[derive(Parser)]
#[command(name = "account-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve(serve::ServeArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["account-gateway", "serve", "--port", "9090"]).unwrap();

        let Command::Serve(args) = cli.command;
        assert_eq!(args.port, Some(9090));
        assert_eq!(args.host, None);
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["account-gateway"]).is_err());
    }
}
