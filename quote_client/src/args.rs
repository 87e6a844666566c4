//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};
use quote_common::net::DEFAULT_PORT;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server IP address or host name where the quote service is running.
    #[clap(long, default_value = "127.0.0.1")]
    pub server_ip: String,

    /// TCP port of the quote service.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the server answers.
    Health,
    /// List every known symbol.
    Symbols,
    /// Fetch daily quotes for a symbol and an inclusive date range.
    Quotes {
        /// Symbol code, e.g. AAPL.
        #[clap(long)]
        symbol: String,
        /// First day, YYYY-MM-DD.
        #[clap(long)]
        start_date: String,
        /// Last day (inclusive), YYYY-MM-DD.
        #[clap(long)]
        end_date: String,
        /// Address that receives the query notification.
        #[clap(long)]
        email: String,
    },
}
