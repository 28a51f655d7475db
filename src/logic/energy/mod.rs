//! Energy analytics: generation vs. usage, avoided emissions, payback.

pub mod balance;
pub mod carbon;
pub mod generation;

pub use balance::{analyze_energy_balance, resolve_generation};
pub use carbon::{
    compute_carbon_and_roi, compute_co2_avoided, compute_roi, daily_generation_kwh,
    EMISSIONS_FACTOR_KG_PER_KWH, REFERENCE_INSOLATION_KWH_PER_M2_DAY,
};
pub use generation::{estimate_generation, latest_positive_irradiance};
