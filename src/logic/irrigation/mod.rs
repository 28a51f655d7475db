//! Irrigation advisory: water need, calm-wind timing and delivery method.

pub mod advisory;
pub mod method;
pub mod need;
pub mod window;

pub use advisory::compute_irrigation_advisory;
pub use method::{select_delivery_method, SPRINKLER_AREA_THRESHOLD_M2};
pub use need::{
    estimate_water_need, evaporation_factor, BASE_RATE_L_PER_M2, DEFAULT_SOIL_MOISTURE,
};
pub use window::{select_optimal_window, CALM_WIND_THRESHOLD_MS};
