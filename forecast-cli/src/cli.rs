use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use forecast_core::{Config, Coordinates, WeatherClient, build_session};
use inquire::{Confirm, CustomType, Text};
use tracing::{error, info};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "api.weather.gov forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set User-Agent, request timeout and default location.
    Configure,

    /// Show the forecast for a location.
    Show {
        /// Latitude; falls back to the configured default location.
        #[arg(long, allow_negative_numbers = true, requires = "lon")]
        lat: Option<f64>,

        /// Longitude; falls back to the configured default location.
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        lon: Option<f64>,

        /// Print the forecast document exactly as the API returned it.
        #[arg(long)]
        raw: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, raw } => show(lat, lon, raw).await,
        }
    }
}

async fn show(lat: Option<f64>, lon: Option<f64>, raw: bool) -> Result<()> {
    let config = Config::load()?;
    let location = resolve_location(lat, lon, &config)?;

    // The session lives here; the client only borrows it.
    let session = build_session(&config)?;
    let client = WeatherClient::new(&session);

    info!(%location, "Fetching forecast");
    let forecast = client
        .get_forecast(location.lat, location.lon)
        .await
        .inspect_err(|err| error!(error = %err, url = err.url(), "Forecast lookup failed"))
        .with_context(|| format!("Failed to fetch forecast for {location}"))?;

    println!("{}", render::render(&forecast, raw)?);
    Ok(())
}

fn resolve_location(lat: Option<f64>, lon: Option<f64>, config: &Config) -> Result<Coordinates> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
        _ => config.default_location(),
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let current_agent = config.user_agent();
    let user_agent = Text::new("User-Agent (api.weather.gov asks for contact info):")
        .with_default(&current_agent)
        .prompt()
        .context("Failed to read User-Agent")?;

    let timeout_secs = CustomType::<u64>::new("Request timeout in seconds:")
        .with_default(config.timeout_secs())
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read timeout")?;

    config.user_agent = Some(user_agent);
    config.timeout_secs = Some(timeout_secs);

    let set_location = Confirm::new("Set a default location?")
        .with_default(config.default_location.is_none())
        .prompt()
        .context("Failed to read answer")?;

    if set_location {
        let lat = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a decimal number, e.g. 39.7456")
            .prompt()
            .context("Failed to read latitude")?;
        let lon = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a decimal number, e.g. -97.0892")
            .prompt()
            .context("Failed to read longitude")?;

        config.set_default_location(Coordinates::new(lat, lon));
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
