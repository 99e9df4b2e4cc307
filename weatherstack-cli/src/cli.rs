use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use weatherstack_core::{
    Config, HistoricalQuery, MarineQuery, WeatherClient, WeatherstackClient,
    config::DEFAULT_BASE_URL,
};

use crate::{interactive, output};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherstack", version, about = "Weatherstack dashboard")]
pub struct Cli {
    /// Verbosity level (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Access key; overrides the config file and WEATHERSTACK_ACCESS_KEY.
    #[arg(long, global = true)]
    pub access_key: Option<String>,

    /// Print the response as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the access key (and optionally a base URL) in the config file.
    Configure,

    /// Show current conditions for a city.
    Current {
        /// City or location query.
        city: String,
    },

    /// Show historical conditions for a city on a given day.
    Historical {
        city: String,

        /// Date as yyyy-MM-dd; defaults to today.
        #[arg(long)]
        date: Option<String>,

        /// Ask for daily totals only.
        #[arg(long)]
        no_hourly: bool,
    },

    /// Show marine conditions for coordinates given as "lat,lon".
    Marine {
        #[arg(allow_hyphen_values = true)]
        coords: MarineQuery,
    },

    /// Interactive dashboard with current, history and marine tabs.
    Dashboard {
        /// Initial city; defaults to New York.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { access_key, json, command, .. } = self;

        match command {
            Command::Configure => configure()?,
            Command::Current { city } => {
                let client = client(access_key)?;
                let snapshot = client.get_current(&city).await?;
                output::print_current(&snapshot, json)?;
            }
            Command::Historical { city, date, no_hourly } => {
                let client = client(access_key)?;
                let mut query = HistoricalQuery::new(city, date.unwrap_or_else(today));
                if no_hourly {
                    query = query.daily_only();
                }
                let snapshot = client.get_historical(&query).await?;
                output::print_historical(&snapshot, json)?;
            }
            Command::Marine { coords } => {
                let client = client(access_key)?;
                let snapshot = client.get_marine(&coords).await?;
                output::print_marine(&snapshot, json)?;
            }
            Command::Dashboard { city } => {
                let config = load_config(access_key)?;
                let client = WeatherstackClient::from_config(&config)?;
                interactive::run(&client, config.on_failure, city).await?;
            }
        }

        Ok(())
    }
}

/// Config from disk and environment, with the command-line key on top.
fn load_config(access_key: Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::load_with_env()?;
    if let Some(key) = access_key {
        config.set_access_key(key);
    }
    Ok(config)
}

fn client(access_key: Option<String>) -> anyhow::Result<WeatherstackClient> {
    WeatherstackClient::from_config(&load_config(access_key)?)
}

fn today() -> String {
    format_date(Local::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("Weatherstack access key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read access key")?;

    let base_url = inquire::Text::new("Base URL:")
        .with_default(config.base_url())
        .prompt()
        .context("Failed to read base URL")?;

    config.set_access_key(key.trim().to_string());
    config.base_url = (base_url.trim() != DEFAULT_BASE_URL).then(|| base_url.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
