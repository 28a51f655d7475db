//! Agronomic decision engine: irrigation advisories, renewable energy
//! balance, carbon and ROI projections for small farms.
//!
//! The engine in [`logic`] is synchronous and pure. Network access lives in
//! [`datasources`] and only produces the raw payloads the engine consumes.

pub mod cli;
pub mod config;
pub mod datasources;
pub mod error;
pub mod logic;
pub mod models;

pub use error::{AgroError, Result};
pub use logic::{
    analyze_energy_balance, compute_carbon_and_roi, compute_irrigation_advisory,
    estimate_generation, resolve_generation, simulate_savings,
};
