use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text, autocompletion::Replacement};
use weather_core::{
    Config, FileStore, RecentSearches, TemperatureUnit, WeatherService, WeatherSession,
    config::MAX_FORECAST_DAYS,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookup with advice for the day")]
pub struct Cli {
    /// Log requests and resolved locations to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather, advice and forecast for a location.
    Show {
        /// Location name; prompts (with recent searches) when omitted.
        location: Option<String>,

        /// Temperature unit: c or f. Defaults to the configured unit.
        #[arg(short, long)]
        unit: Option<TemperatureUnit>,

        /// Number of forecast days.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_FORECAST_DAYS as i64))]
        days: Option<u8>,

        /// Print the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// List recently searched locations.
    Recent {
        /// Forget all recent searches.
        #[arg(long)]
        clear: bool,
    },

    /// Interactively set the default unit and forecast length.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        tracing::debug!(?config, "Loaded configuration");

        match self.command {
            Command::Show { location, unit, days, json } => {
                show(&config, location, unit.unwrap_or(config.unit), days, json).await
            }
            Command::Recent { clear } => recent(clear),
            Command::Configure => configure(config),
        }
    }
}

fn state_store() -> anyhow::Result<FileStore> {
    Ok(FileStore::new(Config::state_file_path()?))
}

async fn show(
    config: &Config,
    location: Option<String>,
    unit: TemperatureUnit,
    days: Option<u8>,
    json: bool,
) -> anyhow::Result<()> {
    let service = WeatherService::from_config(config)
        .context("Failed to set up weather service")?
        .with_forecast_days(days.unwrap_or_else(|| config.forecast_days()));

    let mut session = WeatherSession::new(service, state_store()?);

    let location = match location {
        Some(location) => location,
        None => prompt_location(session.recent())?,
    };

    if !json {
        eprintln!("Fetching weather for {}...", location.trim());
    }

    match session.submit(&location).await {
        Ok(report) => {
            if json {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                print!("{}", render::report_text(report, unit));
            }
            Ok(())
        }
        Err(err) => bail!("{}", err.user_message()),
    }
}

fn prompt_location(recent: &RecentSearches) -> anyhow::Result<String> {
    let suggestions: Vec<String> = recent.iter().cloned().collect();

    let mut prompt = Text::new("Location:").with_autocomplete(RecentSuggester(suggestions));
    if let Some(last) = recent.iter().next() {
        prompt = prompt.with_default(last);
    }

    let answer = prompt.prompt()?;
    if answer.trim().is_empty() {
        bail!("A location is required.");
    }

    Ok(answer)
}

/// Offers recent searches that contain what has been typed so far.
#[derive(Debug, Clone)]
struct RecentSuggester(Vec<String>);

impl inquire::Autocomplete for RecentSuggester {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        let needle = input.trim().to_lowercase();
        Ok(self.0.iter().filter(|s| s.to_lowercase().contains(&needle)).cloned().collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

fn recent(clear: bool) -> anyhow::Result<()> {
    let mut store = state_store()?;
    let mut recent = RecentSearches::load(&store);

    if clear {
        recent.clear();
        recent.save(&mut store)?;
        println!("Recent searches cleared.");
        return Ok(());
    }

    print!("{}", render::recent_text(&recent));
    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let units = TemperatureUnit::all().to_vec();
    let cursor = units.iter().position(|u| *u == config.unit).unwrap_or(0);

    let unit = Select::new("Temperature unit:", units).with_starting_cursor(cursor).prompt()?;

    let days = CustomType::<u8>::new("Forecast days:")
        .with_default(config.forecast_days())
        .with_help_message(&format!("1 to {MAX_FORECAST_DAYS}"))
        .with_error_message("Please type a whole number")
        .prompt()?;

    config.unit = unit;
    config.set_forecast_days(days);
    config.save()?;

    println!(
        "Saved: unit = {}, forecast days = {} ({})",
        config.unit,
        config.forecast_days(),
        Config::config_file_path()?.display()
    );

    Ok(())
}
