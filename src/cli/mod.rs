//! CLI interface for kalshi-gateway
//!
//! Provides subcommands for:
//! - `serve`: Run the signing proxy
//! - `markets`: Print a ranked market list
//! - `sign`: Print auth headers for a request
//! - `config`: Show effective configuration

mod markets;
mod serve;
mod sign;

pub use markets::MarketsArgs;
pub use serve::ServeArgs;
pub use sign::SignArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kalshi-gateway")]
#[command(about = "Signing reverse proxy and market normalizer for the Kalshi trading API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the signing proxy
    Serve(ServeArgs),
    /// Fetch, normalize and print a ranked market list
    Markets(MarketsArgs),
    /// Print the auth headers for one request
    Sign(SignArgs),
    /// Show effective configuration (no secrets)
    Config,
}
