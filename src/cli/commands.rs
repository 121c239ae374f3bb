//! CLI commands and argument parsing

use crate::output::OutputFormat;
use crate::types::{filter_keys, Filters};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Multi-region user directory CLI
#[derive(Parser, Debug)]
#[command(name = "regional-users")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true, env = "REGIONAL_USERS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch users from one region or all of them
    Fetch {
        /// Region code, or "all" for every configured region
        #[arg(short, long, default_value = "all")]
        region: String,

        /// API key (prompted for when absent)
        #[arg(long, env = "API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Shorthand for --format json
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List configured regions
    Regions,

    /// Start the HTTP proxy server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000", env = "PORT")]
        port: u16,
    },
}

/// User filters forwarded to the backend
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Filter by status
    #[arg(long)]
    pub status: Option<String>,

    /// Filter by platform admin flag
    #[arg(long = "platform-admin")]
    pub platform_admin: Option<String>,

    /// Filter by email
    #[arg(long)]
    pub email: Option<String>,

    /// Filter by first name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Filter by last name
    #[arg(long)]
    pub last_name: Option<String>,
}

impl FilterArgs {
    /// Collect the given flags into a filter set
    pub fn to_filters(&self) -> Filters {
        Filters::new()
            .with_opt(filter_keys::STATUS, self.status.clone())
            .with_opt(filter_keys::PLATFORM_ADMIN, self.platform_admin.clone())
            .with_opt(filter_keys::EMAIL, self.email.clone())
            .with_opt(filter_keys::FIRST_NAME, self.first_name.clone())
            .with_opt(filter_keys::LAST_NAME, self.last_name.clone())
    }
}
