use crate::config::EnergyPolicy;
use crate::error::{AgroError, Result};
use crate::models::{round_to, CarbonParams, FinancialProjection, Location, RoiParams};

/// kg CO₂ avoided per kWh of solar replacing grid power
pub const EMISSIONS_FACTOR_KG_PER_KWH: f64 = 0.85;

/// Peak sun hours: kWh reaching one m² of panel per day
pub const REFERENCE_INSOLATION_KWH_PER_M2_DAY: f64 = 5.0;

const DAYS_PER_YEAR: f64 = 365.0;

/// Expected daily output of a panel array in kWh.
pub fn daily_generation_kwh(panel_size_m2: f64, efficiency: f64, policy: &EnergyPolicy) -> f64 {
    panel_size_m2 * efficiency * policy.reference_insolation_kwh_per_m2_day
}

/// Emissions avoided over the requested period, rounded to 3 decimals.
pub fn compute_co2_avoided(params: &CarbonParams, policy: &EnergyPolicy) -> Result<f64> {
    Location::new(params.lat, params.lon)?;
    validate_panel(params.panel_size_m2, params.efficiency)?;

    let generation = daily_generation_kwh(params.panel_size_m2, params.efficiency, policy)
        * params.period.days();

    Ok(round_to(
        generation * policy.emissions_factor_kg_per_kwh,
        3,
    ))
}

/// Yearly savings and payback time.
///
/// Returns `(yearly_savings, payback_years)`. Payback is `None` when the
/// system saves nothing, rather than an infinite or NaN figure.
pub fn compute_roi(params: &RoiParams, policy: &EnergyPolicy) -> Result<(f64, Option<f64>)> {
    validate_panel(params.panel_size_m2, params.efficiency)?;
    non_negative("capex", params.capex)?;
    non_negative("electricity_price", params.electricity_price)?;

    let annual_generation =
        daily_generation_kwh(params.panel_size_m2, params.efficiency, policy) * DAYS_PER_YEAR;
    let yearly_savings = round_to(annual_generation * params.electricity_price, 2);

    let payback_years = if yearly_savings > 0.0 {
        Some(round_to(params.capex / yearly_savings, 2))
    } else {
        None
    };

    Ok((yearly_savings, payback_years))
}

pub fn compute_carbon_and_roi(
    carbon: &CarbonParams,
    roi: &RoiParams,
    policy: &EnergyPolicy,
) -> Result<FinancialProjection> {
    let co2_avoided_kg = compute_co2_avoided(carbon, policy)?;
    let (yearly_savings, payback_years) = compute_roi(roi, policy)?;

    tracing::debug!(
        co2_avoided_kg,
        yearly_savings,
        payback_years = ?payback_years,
        "Computed financial projection"
    );

    Ok(FinancialProjection {
        co2_avoided_kg,
        payback_years,
        yearly_savings,
    })
}

pub(crate) fn validate_panel(panel_size_m2: f64, efficiency: f64) -> Result<()> {
    non_negative("panel_size", panel_size_m2)?;
    if !efficiency.is_finite() || !(0.0..=1.0).contains(&efficiency) {
        return Err(AgroError::InvalidParameter(format!(
            "efficiency must be within [0, 1], got {}",
            efficiency
        )));
    }
    Ok(())
}

pub(crate) fn non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(AgroError::InvalidParameter(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )));
    }
    Ok(())
}
