pub mod energy;
pub mod irrigation;
pub mod simulation;

pub use energy::{
    analyze_energy_balance, compute_carbon_and_roi, estimate_generation, resolve_generation,
};
pub use irrigation::compute_irrigation_advisory;
pub use simulation::simulate_savings;
