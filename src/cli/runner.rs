//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::cli::server::serve;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::output::{Formatter, OutputFormat};
use crate::region::RegionSelection;
use crate::types::{Filters, OptionStringExt};
use std::io::{self, BufRead, Write};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = AppConfig::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::Fetch {
                region,
                api_key,
                format,
                json,
                filters,
            } => {
                let format = if *json { OutputFormat::Json } else { *format };
                self.fetch(&config, region, api_key.clone(), format, &filters.to_filters())
                    .await
            }
            Commands::Regions => {
                self.regions(&config);
                Ok(())
            }
            Commands::Serve { port } => serve(config.aggregator()?, *port).await,
        }
    }

    /// Fetch users and print them
    async fn fetch(
        &self,
        config: &AppConfig,
        region: &str,
        api_key: Option<String>,
        format: OutputFormat,
        filters: &Filters,
    ) -> Result<()> {
        let selection: RegionSelection = region.parse()?;

        let api_key = match api_key.none_if_empty() {
            Some(key) => key.trim().to_string(),
            None => read_api_key(&mut io::stdin().lock(), &mut io::stderr())?,
        };
        if api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }

        let aggregator = config.aggregator()?;
        let result = aggregator.fetch(&selection, &api_key, filters).await?;

        for failure in &result.failures {
            eprintln!(
                "Warning: region {} failed (HTTP {}): {}",
                failure.region.as_deref().unwrap_or("?"),
                failure.status,
                failure.message
            );
        }

        let formatter = Formatter::new(format);
        println!("{}", formatter.format_users(&result.records));
        println!();
        println!(
            "{}",
            formatter.summary(result.records.len(), result.regions_covered)
        );

        Ok(())
    }

    /// Print the region catalog
    fn regions(&self, config: &AppConfig) {
        for region in &config.regions {
            println!("{:<6}  {}", region.code, region.name);
        }
    }
}

/// Prompt for an API key on `output` and read one line from `input`
pub(crate) fn read_api_key(input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    write!(output, "Enter API key: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
