use crate::error::{AgroError, Result};
use crate::models::{round_to, BalanceStatus, EnergyBalance};

/// Generation figure to compare against usage: a non-zero override wins,
/// otherwise the measured solar output.
///
/// `None` when there is neither a usable override nor a measurement; the
/// caller has to obtain one rather than compare against zero.
pub fn resolve_generation(override_kwh: Option<f64>, measured_kwh: Option<f64>) -> Option<f64> {
    match override_kwh {
        Some(v) if v != 0.0 => Some(v),
        _ => measured_kwh,
    }
}

/// Compare generation against usage for the same period.
///
/// The balance is rounded to 3 decimals and the status follows its sign, so
/// the two always agree.
///
/// Fails with `InvalidUsage` for negative or non-finite usage, and with
/// `InvalidGeneration` for negative or non-finite generation.
pub fn analyze_energy_balance(generation_kwh: f64, usage_kwh: f64) -> Result<EnergyBalance> {
    if !usage_kwh.is_finite() || usage_kwh < 0.0 {
        return Err(AgroError::InvalidUsage(format!(
            "usage must be a non-negative number of kWh, got {}",
            usage_kwh
        )));
    }
    if !generation_kwh.is_finite() || generation_kwh < 0.0 {
        return Err(AgroError::InvalidGeneration(format!(
            "generation must be a non-negative number of kWh, got {}",
            generation_kwh
        )));
    }

    let balance_kwh = round_to(generation_kwh - usage_kwh, 3);
    // -0.0 would otherwise serialize with its sign
    let balance_kwh = if balance_kwh == 0.0 { 0.0 } else { balance_kwh };

    Ok(EnergyBalance {
        generation_kwh,
        usage_kwh,
        balance_kwh,
        status: BalanceStatus::from_balance(balance_kwh),
    })
}
