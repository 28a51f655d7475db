use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agrowatt",
    version,
    about = "Irrigation and farm energy advisor"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Irrigation volume, best time and delivery method for a field
    Advise {
        /// Latitude (defaults to farm.latitude)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude (defaults to farm.longitude)
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Field size in m² (defaults to farm.area_size_m2)
        #[arg(long)]
        area: Option<f64>,
        /// Read location data from a JSON file instead of Open-Meteo
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Solar output estimate from the latest NASA POWER irradiance
    Energy {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Panel area in m²
        #[arg(long)]
        panel_size: Option<f64>,
        /// Panel efficiency (0-1)
        #[arg(long)]
        efficiency: Option<f64>,
        /// Share of output consumed on site (0-1)
        #[arg(long)]
        usage_pct: Option<f64>,
        /// UTC day to query, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Compare generation against usage
    Compare {
        /// Generation override in kWh; zero means use the measured value
        #[arg(long)]
        generation: Option<f64>,
        /// Measured solar generation in kWh (fetched from NASA POWER when absent)
        #[arg(long)]
        measured: Option<f64>,
        /// Usage in kWh (defaults to solar.usage_kwh_per_day)
        #[arg(long, allow_hyphen_values = true)]
        usage: Option<f64>,
        /// Site for the fetched measurement (defaults to the farm)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        /// UTC day to query, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// CO₂ avoided by the solar system over a period
    Carbon {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        #[arg(long)]
        panel_size: Option<f64>,
        #[arg(long)]
        efficiency: Option<f64>,
        /// daily, weekly, monthly or yearly
        #[arg(long, default_value = "daily")]
        period: String,
    },
    /// Yearly savings and payback period of the solar system
    Roi {
        #[arg(long)]
        capex: Option<f64>,
        #[arg(long)]
        panel_size: Option<f64>,
        #[arg(long)]
        efficiency: Option<f64>,
        /// Electricity price per kWh
        #[arg(long)]
        price: Option<f64>,
    },
    /// Water and cost saved by precision irrigation
    Simulate {
        /// Field size in acres
        #[arg(long)]
        area: f64,
        /// Crop name (defaults to farm.crop)
        #[arg(long)]
        crop: Option<String>,
        /// Water cost per 1000 litres
        #[arg(long, default_value_t = 6.5)]
        rate: f64,
    },
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
}
