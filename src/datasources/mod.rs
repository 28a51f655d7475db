pub mod nasa_power;
pub mod open_meteo;

pub use nasa_power::{IrradianceSample, NasaPowerClient};
pub use open_meteo::OpenMeteoClient;
