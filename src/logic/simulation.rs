use crate::config::SimulationPolicy;
use crate::error::{AgroError, Result};
use crate::models::{round_to, SimulationResult};

/// Share of the crop's water requirement saved by precision irrigation
pub const WATER_SAVING_SHARE: f64 = 0.3;

/// Up-front precision irrigation cost per acre
pub const INVESTMENT_PER_ACRE: f64 = 5000.0;

/// Requirement (L/acre/day) for crops missing from [`CROP_WATER_REQUIREMENTS`]
pub const DEFAULT_CROP_LITERS_PER_ACRE_DAY: f64 = 18_000.0;

/// Average daily water requirement per acre, in litres, for Indian field crops
pub const CROP_WATER_REQUIREMENTS: &[(&str, f64)] = &[
    ("rice", 45_987.0),
    ("wheat", 15_176.0),
    ("maize", 18_395.0),
    ("sorghum", 19_271.0),
    ("millet", 17_986.0),
    ("barley", 14_000.0),
    ("sugarcane", 24_731.0),
    ("cotton", 17_986.0),
    ("jute", 20_000.0),
    ("tobacco", 21_000.0),
    ("pulses", 16_187.0),
    ("gram", 12_000.0),
    ("lentil", 12_500.0),
    ("pigeonpea", 15_000.0),
    ("mungbean", 14_000.0),
    ("groundnut", 19_656.0),
    ("soybean", 15_176.0),
    ("mustard", 11_803.0),
    ("sunflower", 13_490.0),
    ("sesame", 13_000.0),
    ("castor", 16_000.0),
    ("vegetables", 17_986.0),
    ("potato", 22_483.0),
    ("onion", 20_000.0),
    ("tomato", 18_000.0),
    ("cabbage", 16_000.0),
    ("cauliflower", 16_500.0),
    ("brinjal", 17_000.0),
    ("okra", 15_000.0),
    ("banana", 25_000.0),
    ("mango", 12_000.0),
    ("citrus", 15_000.0),
    ("papaya", 20_000.0),
    ("pomegranate", 14_000.0),
    ("apple", 10_000.0),
    ("grapes", 18_000.0),
    ("guava", 12_000.0),
    ("tea", 20_000.0),
    ("coffee", 17_000.0),
    ("coconut", 25_000.0),
    ("arecanut", 22_000.0),
];

/// Look up a crop's requirement, case-insensitively.
pub fn crop_water_requirement(crop: &str) -> Option<f64> {
    let crop = crop.trim().to_lowercase();
    CROP_WATER_REQUIREMENTS
        .iter()
        .find(|(name, _)| *name == crop)
        .map(|(_, liters)| *liters)
}

/// Daily water and cost savings, and yearly ROI, for `area_acres` of `crop`
/// at `rate` currency units per 1000 L.
pub fn simulate_savings(
    area_acres: f64,
    crop: &str,
    rate: f64,
    policy: &SimulationPolicy,
) -> Result<SimulationResult> {
    if !area_acres.is_finite() || area_acres <= 0.0 {
        return Err(AgroError::InvalidParameter(format!(
            "area must be a positive number of acres, got {}",
            area_acres
        )));
    }
    if !rate.is_finite() || rate < 0.0 {
        return Err(AgroError::InvalidParameter(format!(
            "rate must be a non-negative number, got {}",
            rate
        )));
    }

    let crop = crop.trim().to_lowercase();
    let requirement = crop_water_requirement(&crop).unwrap_or_else(|| {
        tracing::info!(crop = %crop, "Unknown crop - using default water requirement");
        policy.default_crop_liters_per_acre_day
    });

    let water_saved = round_to(area_acres * requirement * policy.water_saving_share, 2);
    let cost_saved = round_to(water_saved / 1000.0 * rate, 2);
    let investment = area_acres * policy.investment_per_acre;
    let roi_percent = if investment > 0.0 {
        round_to(cost_saved * 365.0 / investment * 100.0, 2)
    } else {
        0.0
    };

    Ok(SimulationResult {
        crop,
        area_acres,
        water_saved_liters_per_day: water_saved,
        cost_saved_per_day: cost_saved,
        roi_percent_per_year: roi_percent,
    })
}
