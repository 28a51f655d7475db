use super::{estimate_water_need, select_delivery_method, select_optimal_window};
use crate::config::IrrigationPolicy;
use crate::models::{EnvironmentSnapshot, IrrigationAdvisory, IrrigationRequest};

/// Combine water need, timing and method into one advisory.
///
/// Only call this with a snapshot in hand; a failed fetch is the caller's to
/// report. Partially known conditions still produce an advisory, with the
/// affected fields left `None`.
pub fn compute_irrigation_advisory(
    request: &IrrigationRequest,
    snapshot: &EnvironmentSnapshot,
    policy: &IrrigationPolicy,
) -> IrrigationAdvisory {
    let advisory = IrrigationAdvisory {
        water_liters: estimate_water_need(request.area_size_m2, snapshot, policy),
        best_time: select_optimal_window(&snapshot.history, policy),
        method: select_delivery_method(request.area_size_m2, policy),
    };

    tracing::debug!(
        location = %request.location,
        area_m2 = request.area_size_m2,
        water_liters = ?advisory.water_liters,
        best_time = ?advisory.best_time,
        method = %advisory.method,
        "Computed irrigation advisory"
    );

    advisory
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeliveryMethod, Location, RawEnvironment};
    use serde_json::json;

    fn snapshot() -> EnvironmentSnapshot {
        let raw: RawEnvironment = serde_json::from_value(json!({
            "lat": 23.1,
            "lon": 88.5,
            "temp_max": 30.0,
            "humidity": 40.0,
            "wind_speed": 2.0,
            "soil_moisture": 0.3,
            "history": {
                "time": ["2025-05-01T04:00", "2025-05-01T05:00", "2025-05-01T06:00"],
                "temperature_2m": [21.5, 20.8, 22.0],
                "windspeed_10m": [2.4, 3.6, 1.1]
            }
        }))
        .unwrap();
        EnvironmentSnapshot::from_raw(&raw).unwrap()
    }

    fn request(area: f64) -> IrrigationRequest {
        IrrigationRequest::new(area, Location::new(23.1, 88.5).unwrap()).unwrap()
    }

    #[test]
    fn full_advisory() {
        let advisory =
            compute_irrigation_advisory(&request(500.0), &snapshot(), &IrrigationPolicy::default());

        assert_eq!(advisory.water_liters, Some(3250.0));
        assert_eq!(
            advisory.best_time.map(|t| t.to_rfc3339()),
            Some("2025-05-01T04:00:00+00:00".to_string())
        );
        assert_eq!(advisory.method, DeliveryMethod::DripOrSprinkler);
        assert!(advisory.is_complete());
    }

    #[test]
    fn large_field_gets_sprinklers() {
        let advisory =
            compute_irrigation_advisory(&request(2500.0), &snapshot(), &IrrigationPolicy::default());
        assert_eq!(advisory.method, DeliveryMethod::Sprinkler);
        assert_eq!(advisory.water_liters, Some(16250.0));
    }

    #[test]
    fn partial_environment_gives_partial_advisory() {
        let mut snapshot = snapshot();
        snapshot.history.clear();
        snapshot.soil_moisture = Some(1.0);

        let advisory =
            compute_irrigation_advisory(&request(500.0), &snapshot, &IrrigationPolicy::default());
        assert_eq!(advisory.water_liters, None);
        assert_eq!(advisory.best_time, None);
        assert_eq!(advisory.method, DeliveryMethod::DripOrSprinkler);
        assert!(!advisory.is_complete());
    }

    #[test]
    fn same_input_same_output() {
        let policy = IrrigationPolicy::default();
        let a = compute_irrigation_advisory(&request(750.0), &snapshot(), &policy);
        let b = compute_irrigation_advisory(&request(750.0), &snapshot(), &policy);
        assert_eq!(a, b);
    }
}
