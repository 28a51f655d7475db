use super::reading::PLACEHOLDER;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryMethod {
    Drip,
    Sprinkler,
    DripOrSprinkler,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Drip => "Drip",
            DeliveryMethod::Sprinkler => "Sprinkler",
            DeliveryMethod::DripOrSprinkler => "Drip or Sprinkler",
        }
    }
}

impl std::fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Irrigation volume, timing and method for one area/location request.
///
/// `None` volume or time means the engine could not produce a meaningful
/// figure from the available readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrrigationAdvisory {
    pub water_liters: Option<f64>,
    pub best_time: Option<DateTime<FixedOffset>>,
    pub method: DeliveryMethod,
}

impl IrrigationAdvisory {
    pub fn water_display(&self) -> String {
        match self.water_liters {
            Some(liters) => format!("{:.1} liters", liters),
            None => format!("{} liters", PLACEHOLDER),
        }
    }

    pub fn best_time_display(&self) -> String {
        self.best_time
            .map(|t| t.format("%Y-%m-%d %H:%M %:z").to_string())
            .unwrap_or_else(|| "Unavailable".to_string())
    }

    /// True when every field carries a computed value.
    pub fn is_complete(&self) -> bool {
        self.water_liters.is_some() && self.best_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_method_display() {
        assert_eq!(DeliveryMethod::Drip.as_str(), "Drip");
        assert_eq!(DeliveryMethod::Sprinkler.as_str(), "Sprinkler");
        assert_eq!(DeliveryMethod::DripOrSprinkler.to_string(), "Drip or Sprinkler");
    }

    #[test]
    fn unavailable_fields_render_placeholders() {
        let advisory = IrrigationAdvisory {
            water_liters: None,
            best_time: None,
            method: DeliveryMethod::Sprinkler,
        };
        assert_eq!(advisory.water_display(), "— liters");
        assert_eq!(advisory.best_time_display(), "Unavailable");
        assert!(!advisory.is_complete());
    }

    #[test]
    fn available_fields_render_values() {
        let advisory = IrrigationAdvisory {
            water_liters: Some(3250.0),
            best_time: DateTime::parse_from_rfc3339("2025-05-01T05:00:00+05:30").ok(),
            method: DeliveryMethod::DripOrSprinkler,
        };
        assert_eq!(advisory.water_display(), "3250.0 liters");
        assert_eq!(advisory.best_time_display(), "2025-05-01 05:00 +05:30");
        assert!(advisory.is_complete());
    }
}
