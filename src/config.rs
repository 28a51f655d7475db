use crate::error::{AgroError, Result};
use crate::logic::energy::{EMISSIONS_FACTOR_KG_PER_KWH, REFERENCE_INSOLATION_KWH_PER_M2_DAY};
use crate::logic::irrigation::{
    BASE_RATE_L_PER_M2, CALM_WIND_THRESHOLD_MS, DEFAULT_SOIL_MOISTURE,
    SPRINKLER_AREA_THRESHOLD_M2,
};
use crate::logic::simulation::{
    DEFAULT_CROP_LITERS_PER_ACRE_DAY, INVESTMENT_PER_ACRE, WATER_SAVING_SHARE,
};
use dialoguer::Input;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const ENV_PREFIX: &str = "AGROWATT";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub farm: FarmConfig,
    pub solar: SolarConfig,
    pub irrigation: IrrigationPolicy,
    pub energy: EnergyPolicy,
    pub simulation: SimulationPolicy,
    pub open_meteo: OpenMeteoConfig,
    pub nasa_power: NasaPowerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FarmConfig {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub area_size_m2: f64,
    pub crop: String,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            name: "Main Field".into(),
            latitude: None,
            longitude: None,
            area_size_m2: 1000.0,
            crop: "maize".into(),
        }
    }
}

/// Installed solar system used for the energy, carbon and ROI figures.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SolarConfig {
    pub panel_size_m2: f64,
    pub efficiency: f64,
    pub usage_pct: f64,
    pub usage_kwh_per_day: f64,
    pub capex: f64,
    pub electricity_price: f64,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            panel_size_m2: 10.0,
            efficiency: 0.20,
            usage_pct: 0.60,
            usage_kwh_per_day: 5.0,
            capex: 80_000.0,
            electricity_price: 7.0,
        }
    }
}

/// Tunables of the irrigation advisory. The defaults are policy choices,
/// expected to be overridden per region.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IrrigationPolicy {
    /// Litres of water per m² before moisture and evaporation adjustments
    pub base_rate_l_per_m2: f64,
    /// Soil moisture (m³/m³) assumed when no reading is available
    pub default_soil_moisture: f64,
    /// Forecast hours with wind at or above this (m/s) are never recommended
    pub calm_wind_threshold_ms: f64,
    /// Areas strictly above this (m²) get sprinkler-only advice
    pub sprinkler_area_threshold_m2: f64,
    /// Areas strictly below this (m²) get drip-only advice; off when unset
    pub drip_only_below_m2: Option<f64>,
}

impl Default for IrrigationPolicy {
    fn default() -> Self {
        Self {
            base_rate_l_per_m2: BASE_RATE_L_PER_M2,
            default_soil_moisture: DEFAULT_SOIL_MOISTURE,
            calm_wind_threshold_ms: CALM_WIND_THRESHOLD_MS,
            sprinkler_area_threshold_m2: SPRINKLER_AREA_THRESHOLD_M2,
            drip_only_below_m2: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnergyPolicy {
    /// Grid emissions displaced per kWh of solar generation
    pub emissions_factor_kg_per_kwh: f64,
    /// Daily solar energy reaching one m² of panel (peak sun hours)
    pub reference_insolation_kwh_per_m2_day: f64,
}

impl Default for EnergyPolicy {
    fn default() -> Self {
        Self {
            emissions_factor_kg_per_kwh: EMISSIONS_FACTOR_KG_PER_KWH,
            reference_insolation_kwh_per_m2_day: REFERENCE_INSOLATION_KWH_PER_M2_DAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationPolicy {
    /// Share of the crop's water requirement saved by precision irrigation
    pub water_saving_share: f64,
    /// Up-front cost per acre
    pub investment_per_acre: f64,
    /// Requirement assumed for crops missing from the table
    pub default_crop_liters_per_acre_day: f64,
}

impl Default for SimulationPolicy {
    fn default() -> Self {
        Self {
            water_saving_share: WATER_SAVING_SHARE,
            investment_per_acre: INVESTMENT_PER_ACRE,
            default_crop_liters_per_acre_day: DEFAULT_CROP_LITERS_PER_ACRE_DAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OpenMeteoConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub enabled: bool,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1".into(),
            timeout_secs: 10,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NasaPowerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub enabled: bool,
}

impl Default for NasaPowerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://power.larc.nasa.gov/api/temporal/hourly/point".into(),
            timeout_secs: 10,
            enabled: true,
        }
    }
}

impl Config {
    /// Load configuration from YAML, then apply `AGROWATT__SECTION__KEY`
    /// environment overrides.
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and built-in defaults are used when nothing is found.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) if !p.exists() => {
                return Err(AgroError::Config(format!(
                    "Config file not found at {:?}. Run `agrowatt init` to set up.",
                    p
                )));
            }
            Some(p) => Some(p),
            None => Self::find_config_path(),
        };

        let yaml = match &config_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| AgroError::Config(format!("Failed to read config: {}", e)))?;
                tracing::debug!("Loaded config from {}", path.display());
                Self::substitute_env_vars(&content)
            }
            None => {
                tracing::info!("No config file found - using built-in defaults");
                String::new()
            }
        };

        Self::from_yaml_with_env(&yaml)
    }

    fn from_yaml_with_env(yaml: &str) -> Result<Self> {
        let mut builder = ::config::Config::builder();
        if !yaml.trim().is_empty() {
            builder = builder.add_source(::config::File::from_str(yaml, ::config::FileFormat::Yaml));
        }

        let config: Config = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let p = &self.irrigation;
        if !(p.base_rate_l_per_m2.is_finite() && p.base_rate_l_per_m2 > 0.0) {
            return Err(AgroError::Config(
                "irrigation.base_rate_l_per_m2 must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&p.default_soil_moisture) {
            return Err(AgroError::Config(
                "irrigation.default_soil_moisture must be within [0, 1]".into(),
            ));
        }
        if !(p.calm_wind_threshold_ms.is_finite() && p.calm_wind_threshold_ms > 0.0) {
            return Err(AgroError::Config(
                "irrigation.calm_wind_threshold_ms must be positive".into(),
            ));
        }
        if !(p.sprinkler_area_threshold_m2.is_finite() && p.sprinkler_area_threshold_m2 >= 0.0) {
            return Err(AgroError::Config(
                "irrigation.sprinkler_area_threshold_m2 must not be negative".into(),
            ));
        }
        if let Some(drip) = p.drip_only_below_m2 {
            if !(drip.is_finite() && drip >= 0.0) {
                return Err(AgroError::Config(
                    "irrigation.drip_only_below_m2 must not be negative".into(),
                ));
            }
            if drip > p.sprinkler_area_threshold_m2 {
                return Err(AgroError::Config(
                    "irrigation.drip_only_below_m2 must not exceed sprinkler_area_threshold_m2"
                        .into(),
                ));
            }
        }

        let e = &self.energy;
        if !non_negative(e.emissions_factor_kg_per_kwh)
            || !non_negative(e.reference_insolation_kwh_per_m2_day)
        {
            return Err(AgroError::Config(
                "energy factors must be finite and not negative".into(),
            ));
        }

        let s = &self.simulation;
        if !(0.0..=1.0).contains(&s.water_saving_share) {
            return Err(AgroError::Config(
                "simulation.water_saving_share must be within [0, 1]".into(),
            ));
        }
        if !(s.investment_per_acre.is_finite() && s.investment_per_acre > 0.0) {
            return Err(AgroError::Config(
                "simulation.investment_per_acre must be positive".into(),
            ));
        }
        if !non_negative(s.default_crop_liters_per_acre_day) {
            return Err(AgroError::Config(
                "simulation.default_crop_liters_per_acre_day must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        dirs::config_dir()
            .map(|dir| dir.join("agrowatt").join("config.yaml"))
            .filter(|p| p.exists())
    }

    /// Default path for writing new config files (~/.config/agrowatt/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgroError::Config("Cannot determine config directory".into()))?
            .join("agrowatt");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up agrowatt!");
        println!();

        let defaults = Config::default();

        println!("Farm");
        let name: String = prompt("  Field name", defaults.farm.name.clone())?;
        let latitude: f64 = prompt("  Latitude", 23.1)?;
        let longitude: f64 = prompt("  Longitude", 88.5)?;
        let area_size_m2: f64 = prompt("  Field size (m²)", defaults.farm.area_size_m2)?;
        let crop: String = prompt("  Main crop", defaults.farm.crop.clone())?;

        println!();

        println!("Solar system");
        let panel_size_m2: f64 = prompt("  Panel size (m²)", defaults.solar.panel_size_m2)?;
        let efficiency: f64 = prompt("  Efficiency (0-1)", defaults.solar.efficiency)?;
        let usage_kwh_per_day: f64 =
            prompt("  Usage (kWh/day)", defaults.solar.usage_kwh_per_day)?;
        let capex: f64 = prompt("  Installation cost", defaults.solar.capex)?;
        let electricity_price: f64 =
            prompt("  Electricity price per kWh", defaults.solar.electricity_price)?;

        println!();

        let config = Config {
            farm: FarmConfig {
                name,
                latitude: Some(latitude),
                longitude: Some(longitude),
                area_size_m2,
                crop,
            },
            solar: SolarConfig {
                panel_size_m2,
                efficiency,
                usage_kwh_per_day,
                capex,
                electricity_price,
                ..defaults.solar
            },
            ..defaults
        };
        config.validate()?;

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AgroError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# agrowatt configuration\n# Generated by `agrowatt init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return result;
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn prompt<T>(label: &str, default: T) -> Result<T>
where
    T: Clone + std::fmt::Display + std::str::FromStr,
    T::Err: std::fmt::Display + std::fmt::Debug,
{
    Input::new()
        .with_prompt(label)
        .default(default)
        .interact_text()
        .map_err(|e| AgroError::Config(format!("Input error: {}", e)))
}
