use serde::{Deserialize, Serialize};

/// Projected savings from switching a farm to precision irrigation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub crop: String,
    pub area_acres: f64,
    pub water_saved_liters_per_day: f64,
    pub cost_saved_per_day: f64,
    pub roi_percent_per_year: f64,
}
