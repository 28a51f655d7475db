use crate::config::IrrigationPolicy;
use crate::models::{round_to, EnvironmentSnapshot};

/// Litres per m² before adjustments
pub const BASE_RATE_L_PER_M2: f64 = 5.0;

/// Soil moisture (m³/m³) assumed when the snapshot has none
pub const DEFAULT_SOIL_MOISTURE: f64 = 0.25;

/// Temperature (°C) that adds one full unit of evaporation
const EVAPORATION_TEMP_SCALE_C: f64 = 35.0;

/// Wind speed (m/s) that adds one full unit of evaporation
const EVAPORATION_WIND_SCALE_MS: f64 = 5.0;

/// Estimate the irrigation volume in litres for `area_size_m2`.
///
/// ```text
/// water = base_rate × area × (1 − soil_moisture) × evaporation_factor
/// ```
///
/// Returns `None` when the result is not positive, which happens for
/// saturated soil or when humidity outweighs temperature and wind.
pub fn estimate_water_need(
    area_size_m2: f64,
    snapshot: &EnvironmentSnapshot,
    policy: &IrrigationPolicy,
) -> Option<f64> {
    let soil_moisture = snapshot
        .soil_moisture
        .unwrap_or(policy.default_soil_moisture);
    let moisture_adjustment = 1.0 - soil_moisture;

    let water = policy.base_rate_l_per_m2
        * area_size_m2
        * moisture_adjustment
        * evaporation_factor(snapshot);

    if water > 0.0 {
        Some(round_to(water, 1))
    } else {
        None
    }
}

/// `1 + temp_max/35 + wind/5 − humidity/100`
///
/// Fallback policy: a missing reading contributes 0 to its term, exactly as a
/// real zero reading would. This understates evaporation when temperature or
/// wind is unknown.
pub fn evaporation_factor(snapshot: &EnvironmentSnapshot) -> f64 {
    let temp_max = snapshot.temp_max.unwrap_or(0.0);
    let wind_speed = snapshot.wind_speed.unwrap_or(0.0);
    let humidity = snapshot.humidity.unwrap_or(0.0);

    1.0 + temp_max / EVAPORATION_TEMP_SCALE_C + wind_speed / EVAPORATION_WIND_SCALE_MS
        - humidity / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn snapshot(
        soil_moisture: Option<f64>,
        temp_max: Option<f64>,
        wind_speed: Option<f64>,
        humidity: Option<f64>,
    ) -> EnvironmentSnapshot {
        let mut s = EnvironmentSnapshot::new(Location { lat: 23.1, lon: 88.5 });
        s.soil_moisture = soil_moisture;
        s.temp_max = temp_max;
        s.wind_speed = wind_speed;
        s.humidity = humidity;
        s
    }

    #[test]
    fn warm_breezy_day() {
        let s = snapshot(Some(0.3), Some(30.0), Some(2.0), Some(40.0));
        // 1 + 30/35 + 2/5 - 40/100 = 13/7
        assert!((evaporation_factor(&s) - 13.0 / 7.0).abs() < 1e-12);
        // 5 × 500 × 0.7 × 13/7
        assert_eq!(
            estimate_water_need(500.0, &s, &IrrigationPolicy::default()),
            Some(3250.0)
        );
    }

    #[test]
    fn result_rounded_to_one_decimal() {
        let s = snapshot(Some(0.3), Some(16.0), Some(1.0), Some(60.0));
        // 1 + 16/35 + 0.2 - 0.6 = 1.0571428..., × 5 × 100 × 0.7 = 370.0
        assert_eq!(
            estimate_water_need(100.0, &s, &IrrigationPolicy::default()),
            Some(370.0)
        );

        let s = snapshot(Some(0.1), Some(20.0), Some(0.0), Some(50.0));
        // 1 + 0.5714285... - 0.5 = 1.0714285..., × 5 × 10 × 0.9 = 48.214...
        assert_eq!(
            estimate_water_need(10.0, &s, &IrrigationPolicy::default()),
            Some(48.2)
        );
    }

    #[test]
    fn saturated_calm_humid_is_unavailable() {
        let s = snapshot(Some(1.0), Some(0.0), Some(0.0), Some(100.0));
        for area in [1.0, 500.0, 10_000.0] {
            assert_eq!(
                estimate_water_need(area, &s, &IrrigationPolicy::default()),
                None
            );
        }
    }

    #[test]
    fn negative_evaporation_is_unavailable() {
        // Dry soil, but cold, calm and humid pushes the factor below zero.
        let s = snapshot(Some(0.1), Some(-10.0), Some(0.0), Some(95.0));
        assert!(evaporation_factor(&s) < 0.0);
        assert_eq!(
            estimate_water_need(500.0, &s, &IrrigationPolicy::default()),
            None
        );
    }

    #[test]
    fn missing_soil_moisture_uses_policy_default() {
        let s = snapshot(None, None, None, None);
        // 5 × 100 × 0.75 × 1.0
        assert_eq!(
            estimate_water_need(100.0, &s, &IrrigationPolicy::default()),
            Some(375.0)
        );

        let policy = IrrigationPolicy {
            default_soil_moisture: 0.5,
            base_rate_l_per_m2: 4.0,
            ..IrrigationPolicy::default()
        };
        assert_eq!(estimate_water_need(100.0, &s, &policy), Some(200.0));
    }

    #[test]
    fn missing_components_count_as_zero() {
        let missing = snapshot(Some(0.2), None, Some(1.0), None);
        let zeros = snapshot(Some(0.2), Some(0.0), Some(1.0), Some(0.0));
        assert_eq!(evaporation_factor(&missing), evaporation_factor(&zeros));
        assert_eq!(
            estimate_water_need(250.0, &missing, &IrrigationPolicy::default()),
            estimate_water_need(250.0, &zeros, &IrrigationPolicy::default())
        );
    }

    #[test]
    fn out_of_range_moisture_is_not_clamped() {
        // Readings above 1 m³/m³ flip the moisture term negative.
        let s = snapshot(Some(1.2), Some(30.0), Some(2.0), Some(40.0));
        assert_eq!(
            estimate_water_need(500.0, &s, &IrrigationPolicy::default()),
            None
        );
    }
}
