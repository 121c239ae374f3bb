//! CLI module
//!
//! Command-line interface and HTTP proxy over the aggregator.
//!
//! # Commands
//!
//! - `fetch` - Fetch users and print them as a table or JSON
//! - `regions` - List configured regions
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, FilterArgs};
pub use runner::Runner;
pub use server::{router, serve, AppState};
