use agrowatt::cli::{Cli, Commands};
use agrowatt::config::{Config, SolarConfig};
use agrowatt::datasources::{IrradianceSample, NasaPowerClient, OpenMeteoClient};
use agrowatt::logic::{
    analyze_energy_balance, compute_carbon_and_roi, compute_irrigation_advisory,
    estimate_generation, resolve_generation, simulate_savings,
};
use agrowatt::logic::energy::{compute_co2_avoided, compute_roi};
use agrowatt::models::{
    display_reading, CarbonParams, EnvironmentSnapshot, GenerationEstimate, IrrigationRequest,
    Location, Period, RawEnvironment, RoiParams, PLACEHOLDER,
};
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init = cli.command {
        Config::setup_interactive()?;
        return Ok(());
    }

    let config = Config::load(cli.config.clone()).context("Configuration error")?;

    match cli.command {
        Commands::Advise {
            lat,
            lon,
            area,
            input,
        } => {
            let location = farm_location(&config, lat, lon)?;
            let area = area.unwrap_or(config.farm.area_size_m2);
            let request = IrrigationRequest::new(area, location)?;

            let raw = match input {
                Some(path) => read_location_data(&path, &location)?,
                None => {
                    if !config.open_meteo.enabled {
                        bail!("Open-Meteo is disabled; pass --input with location data");
                    }
                    OpenMeteoClient::new(config.open_meteo.clone())?
                        .fetch_location_data(&location)
                        .await
                        .context("Could not fetch location data")?
                }
            };
            let snapshot = EnvironmentSnapshot::from_raw(&raw)?;
            let advisory = compute_irrigation_advisory(&request, &snapshot, &config.irrigation);

            if cli.json {
                print_json(&serde_json::json!({
                    "conditions": snapshot,
                    "advisory": advisory,
                }))?;
            } else {
                print_conditions(&snapshot);
                println!();
                println!("Water needed:  {}", advisory.water_display());
                println!("Best time:     {}", advisory.best_time_display());
                println!("Method:        {}", advisory.method);
                if !advisory.is_complete() {
                    println!();
                    println!("Some figures are unavailable: the location data lacks the readings they need.");
                }
            }
        }
        Commands::Energy {
            lat,
            lon,
            panel_size,
            efficiency,
            usage_pct,
            date,
        } => {
            let location = farm_location(&config, lat, lon)?;
            let solar = SolarConfig {
                panel_size_m2: panel_size.unwrap_or(config.solar.panel_size_m2),
                efficiency: efficiency.unwrap_or(config.solar.efficiency),
                usage_pct: usage_pct.unwrap_or(config.solar.usage_pct),
                ..config.solar.clone()
            };
            let (sample, estimate) = latest_solar_estimate(&config, &solar, &location, date).await?;

            if cli.json {
                print_json(&estimate)?;
            } else {
                println!("Hour (UTC):    {}", estimate.reading.timestamp.format("%Y-%m-%d %H:%M"));
                println!("Irradiance:    {:.1} Wh/m²", sample.wh_per_m2);
                println!("Solar:         {:.3} kW", estimate.reading.solar_kw);
                println!("Wind:          {:.3} kW", estimate.reading.wind_kw);
                println!("Hydro:         {:.3} kW", estimate.reading.hydro_kw);
                println!("Total:         {:.3} kW", estimate.reading.total_kw());
                println!("Used on site:  {:.3} kW", estimate.usage_kw);
                println!("CO₂ saved:     {:.3} kg", estimate.co2_saved_kg);
            }
        }
        Commands::Compare {
            generation,
            measured,
            usage,
            lat,
            lon,
            date,
        } => {
            let generation = match resolve_generation(generation, measured) {
                Some(kwh) => kwh,
                None => {
                    let location = farm_location(&config, lat, lon)?;
                    let (_, estimate) =
                        latest_solar_estimate(&config, &config.solar, &location, date)
                            .await
                            .context("No generation figure: pass --generation or --measured")?;
                    tracing::info!(
                        solar_kw = estimate.reading.solar_kw,
                        "Using latest measured solar output"
                    );
                    estimate.reading.solar_kw
                }
            };
            let usage = usage.unwrap_or(config.solar.usage_kwh_per_day);
            let balance = analyze_energy_balance(generation, usage)?;

            if cli.json {
                print_json(&balance)?;
            } else {
                println!("Generation:    {:.3} kWh", balance.generation_kwh);
                println!("Usage:         {:.3} kWh", balance.usage_kwh);
                println!("Balance:       {:.3} kWh", balance.balance_kwh);
                println!("Status:        {}", balance.status);
            }
        }
        Commands::Carbon {
            lat,
            lon,
            panel_size,
            efficiency,
            period,
        } => {
            let location = farm_location(&config, lat, lon)?;
            let Some(period) = Period::from_str(&period) else {
                bail!("Unknown period '{}': use daily, weekly, monthly or yearly", period);
            };
            let params = CarbonParams {
                lat: location.lat,
                lon: location.lon,
                panel_size_m2: panel_size.unwrap_or(config.solar.panel_size_m2),
                efficiency: efficiency.unwrap_or(config.solar.efficiency),
                period,
            };
            let co2_avoided_kg = compute_co2_avoided(&params, &config.energy)?;

            if cli.json {
                print_json(&serde_json::json!({
                    "period": period,
                    "co2_avoided_kg": co2_avoided_kg,
                }))?;
            } else {
                println!("CO₂ avoided ({}): {:.3} kg", period, co2_avoided_kg);
            }
        }
        Commands::Roi {
            capex,
            panel_size,
            efficiency,
            price,
        } => {
            let location = farm_location(&config, None, None).ok();
            let roi = RoiParams {
                capex: capex.unwrap_or(config.solar.capex),
                panel_size_m2: panel_size.unwrap_or(config.solar.panel_size_m2),
                efficiency: efficiency.unwrap_or(config.solar.efficiency),
                electricity_price: price.unwrap_or(config.solar.electricity_price),
            };

            // The full projection needs a site; without one only savings are reported
            match location {
                Some(location) => {
                    let carbon = CarbonParams {
                        lat: location.lat,
                        lon: location.lon,
                        panel_size_m2: roi.panel_size_m2,
                        efficiency: roi.efficiency,
                        period: Period::Yearly,
                    };
                    let projection = compute_carbon_and_roi(&carbon, &roi, &config.energy)?;
                    if cli.json {
                        print_json(&projection)?;
                    } else {
                        println!("Yearly savings:   {:.2}", projection.yearly_savings);
                        println!("Payback:          {}", payback_display(projection.payback_years));
                        println!("CO₂ avoided/year: {:.3} kg", projection.co2_avoided_kg);
                    }
                }
                None => {
                    let (yearly_savings, payback_years) = compute_roi(&roi, &config.energy)?;
                    if cli.json {
                        print_json(&serde_json::json!({
                            "yearly_savings": yearly_savings,
                            "payback_years": payback_years,
                        }))?;
                    } else {
                        println!("Yearly savings:   {:.2}", yearly_savings);
                        println!("Payback:          {}", payback_display(payback_years));
                    }
                }
            }
        }
        Commands::Simulate { area, crop, rate } => {
            let crop = crop.unwrap_or_else(|| config.farm.crop.clone());
            let result = simulate_savings(area, &crop, rate, &config.simulation)?;

            if cli.json {
                print_json(&result)?;
            } else {
                println!("Crop:          {}", result.crop);
                println!("Area:          {} acres", result.area_acres);
                println!("Water saved:   {:.2} liters/day", result.water_saved_liters_per_day);
                println!("Cost saved:    {:.2} per day", result.cost_saved_per_day);
                println!("ROI:           {:.2}% per year", result.roi_percent_per_year);
            }
        }
        Commands::Check => run_check(&config).await?,
        // Handled before the config is loaded
        Commands::Init => {}
    }

    Ok(())
}

/// Coordinates from the command line, falling back to the configured farm.
fn farm_location(config: &Config, lat: Option<f64>, lon: Option<f64>) -> Result<Location> {
    let location = Location::from_parts(
        lat.or(config.farm.latitude),
        lon.or(config.farm.longitude),
    )
    .context("Pass --lat/--lon or set farm.latitude/farm.longitude")?;
    Ok(location)
}

/// Latest positive irradiance hour for `date` (today by default) and the solar
/// output it implies for `solar`.
async fn latest_solar_estimate(
    config: &Config,
    solar: &SolarConfig,
    location: &Location,
    date: Option<NaiveDate>,
) -> Result<(IrradianceSample, GenerationEstimate)> {
    if !config.nasa_power.enabled {
        bail!("NASA POWER is disabled in the configuration");
    }
    let date = date.unwrap_or_else(|| Utc::now().date_naive());

    let sample = NasaPowerClient::new(config.nasa_power.clone())?
        .fetch_latest_irradiance(location, date)
        .await
        .context("Could not fetch irradiance")?;
    let estimate = estimate_generation(sample.hour, sample.wh_per_m2, solar, &config.energy)?;
    Ok((sample, estimate))
}

fn read_location_data(path: &Path, location: &Location) -> Result<RawEnvironment> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut raw: RawEnvironment = serde_json::from_str(&content)
        .with_context(|| format!("Invalid location data in {}", path.display()))?;

    if raw.latitude.is_none() && raw.longitude.is_none() {
        raw.latitude = Some(Value::from(location.lat));
        raw.longitude = Some(Value::from(location.lon));
    }
    Ok(raw)
}

fn print_conditions(snapshot: &EnvironmentSnapshot) {
    println!("Location:      {}", snapshot.location);
    println!("Max temp:      {}", display_reading(snapshot.temp_max, "°C"));
    println!("Min temp:      {}", display_reading(snapshot.temp_min, "°C"));
    println!("Humidity:      {}", display_reading(snapshot.humidity, "%"));
    println!("Wind:          {}", display_reading(snapshot.wind_speed, "m/s"));
    println!("Rainfall:      {}", display_reading(snapshot.rainfall, "mm"));
    println!("Soil moisture: {}", display_reading(snapshot.soil_moisture, "m³/m³"));
}

fn payback_display(payback_years: Option<f64>) -> String {
    match payback_years {
        Some(years) => format!("{:.2} years", years),
        None => PLACEHOLDER.to_string(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_check(config: &Config) -> Result<()> {
    println!("Configuration OK");
    println!("  Farm:        {}", config.farm.name);

    let location = match Location::from_parts(config.farm.latitude, config.farm.longitude) {
        Ok(location) => location,
        Err(e) => {
            println!("  Location:    {} ({})", PLACEHOLDER, e);
            return Ok(());
        }
    };
    println!("  Location:    {}", location);

    if config.open_meteo.enabled {
        let client = OpenMeteoClient::new(config.open_meteo.clone())?;
        match client.test_connection(&location).await {
            Ok(true) => println!("  Open-Meteo:  OK"),
            Ok(false) => println!("  Open-Meteo:  unexpected response"),
            Err(e) => println!("  Open-Meteo:  FAILED ({})", e),
        }
    } else {
        println!("  Open-Meteo:  disabled");
    }

    if config.nasa_power.enabled {
        let client = NasaPowerClient::new(config.nasa_power.clone())?;
        match client.test_connection(&location, Utc::now().date_naive()).await {
            Ok(true) => println!("  NASA POWER:  OK"),
            Ok(false) => println!("  NASA POWER:  unexpected response"),
            Err(e) => println!("  NASA POWER:  FAILED ({})", e),
        }
    } else {
        println!("  NASA POWER:  disabled");
    }

    Ok(())
}
