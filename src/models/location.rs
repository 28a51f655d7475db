use crate::error::{AgroError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Validated coordinates. Both must be finite and within the WGS84 range.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(AgroError::InvalidLocation(format!(
                "latitude {} outside [-90, 90]",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(AgroError::InvalidLocation(format!(
                "longitude {} outside [-180, 180]",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Build from optional coordinates, as found in loosely-typed payloads.
    pub fn from_parts(lat: Option<f64>, lon: Option<f64>) -> Result<Self> {
        match (lat, lon) {
            (Some(lat), Some(lon)) => Self::new(lat, lon),
            (None, _) => Err(AgroError::InvalidLocation("missing latitude".into())),
            (_, None) => Err(AgroError::InvalidLocation("missing longitude".into())),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrigationRequest {
    pub area_size_m2: f64,
    pub location: Location,
}

impl IrrigationRequest {
    pub fn new(area_size_m2: f64, location: Location) -> Result<Self> {
        if !area_size_m2.is_finite() || area_size_m2 <= 0.0 {
            return Err(AgroError::InvalidArea(format!(
                "area must be a positive number of m², got {}",
                area_size_m2
            )));
        }
        Ok(Self {
            area_size_m2,
            location,
        })
    }
}
