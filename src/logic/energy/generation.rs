use super::carbon::{non_negative, validate_panel};
use crate::config::{EnergyPolicy, SolarConfig};
use crate::error::Result;
use crate::models::{round_to, EnergyReading, GenerationEstimate};
use chrono::{DateTime, Utc};

/// The most recent hour with positive irradiance.
///
/// Keys are sortable hour stamps (`YYYYMMDDHH`); night hours and fill values
/// (zero or negative) are skipped.
pub fn latest_positive_irradiance<'a, I>(series: I) -> Option<(&'a str, f64)>
where
    I: IntoIterator<Item = (&'a String, &'a f64)>,
{
    series
        .into_iter()
        .filter(|(_, wh)| wh.is_finite() && **wh > 0.0)
        .max_by(|a, b| a.0.cmp(b.0))
        .map(|(hour, wh)| (hour.as_str(), *wh))
}

/// Solar output, self-consumption and CO₂ saved for one irradiance sample.
///
/// `irradiance_wh_per_m2` is the hourly surface shortwave irradiance. Wind
/// and hydro are reported as zero since no source measures them.
pub fn estimate_generation(
    timestamp: DateTime<Utc>,
    irradiance_wh_per_m2: f64,
    solar: &SolarConfig,
    policy: &EnergyPolicy,
) -> Result<GenerationEstimate> {
    non_negative("irradiance", irradiance_wh_per_m2)?;
    validate_panel(solar.panel_size_m2, solar.efficiency)?;
    non_negative("usage_pct", solar.usage_pct)?;

    let irradiance_kwh = irradiance_wh_per_m2 / 1000.0;
    let solar_kw = round_to(irradiance_kwh * solar.panel_size_m2 * solar.efficiency, 3);
    let usage_kw = round_to(solar_kw * solar.usage_pct, 3);
    let co2_saved_kg = round_to(
        (solar_kw - usage_kw) * policy.emissions_factor_kg_per_kwh,
        3,
    )
    .max(0.0);

    Ok(GenerationEstimate {
        reading: EnergyReading::solar(timestamp, solar_kw),
        usage_kw,
        co2_saved_kg,
    })
}
