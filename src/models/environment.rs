use super::location::Location;
use super::reading::numeric;
use crate::error::Result;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NAIVE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Location-keyed environmental payload as handed over by a data source.
///
/// Every value is kept as raw JSON until [`EnvironmentSnapshot::from_raw`]
/// validates it, so a non-numeric reading can never sneak in as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEnvironment {
    #[serde(default, alias = "lat", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Value>,
    #[serde(default, alias = "lon", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_seconds: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<RawHistory>,
}

/// Hourly series as parallel, index-aligned arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawHistory {
    #[serde(default)]
    pub time: Vec<Value>,
    #[serde(default)]
    pub temperature_2m: Vec<Value>,
    #[serde(default, alias = "wind_speed_10m")]
    pub windspeed_10m: Vec<Value>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Value>,
    #[serde(default)]
    pub precipitation: Vec<Value>,
}

/// A single hourly forecast sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub timestamp: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>, // °C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>, // m/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>, // %
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>, // mm
}

impl HourlyPoint {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        temperature: Option<f64>,
        wind_speed: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            temperature,
            wind_speed,
            humidity: None,
            precipitation: None,
        }
    }
}

/// Validated, immutable environmental conditions for one location query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_moisture: Option<f64>,
    #[serde(default)]
    pub history: Vec<HourlyPoint>,
}

impl EnvironmentSnapshot {
    /// An empty snapshot for `location`, every reading unknown.
    #[cfg(test)]
    pub(crate) fn new(location: Location) -> Self {
        Self {
            location,
            temp_max: None,
            temp_min: None,
            temperature: None,
            humidity: None,
            wind_speed: None,
            rainfall: None,
            soil_moisture: None,
            history: Vec::new(),
        }
    }

    /// Normalize a raw payload into a snapshot.
    ///
    /// Fails only when the payload carries no usable coordinates. Out-of-range
    /// readings are logged and passed through unchanged.
    pub fn from_raw(raw: &RawEnvironment) -> Result<Self> {
        let location = Location::from_parts(
            numeric(raw.latitude.as_ref()),
            numeric(raw.longitude.as_ref()),
        )?;

        let offset = raw
            .utc_offset_seconds
            .as_ref()
            .and_then(Value::as_i64)
            .and_then(|secs| i32::try_from(secs).ok())
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());

        let snapshot = Self {
            location,
            temp_max: numeric(raw.temp_max.as_ref()),
            temp_min: numeric(raw.temp_min.as_ref()),
            temperature: numeric(raw.temperature.as_ref()),
            humidity: checked("humidity", numeric(raw.humidity.as_ref()), 0.0, 100.0),
            wind_speed: checked(
                "wind_speed",
                numeric(raw.wind_speed.as_ref()),
                0.0,
                f64::INFINITY,
            ),
            rainfall: checked(
                "rainfall",
                numeric(raw.rainfall.as_ref()),
                0.0,
                f64::INFINITY,
            ),
            soil_moisture: checked(
                "soil_moisture",
                numeric(raw.soil_moisture.as_ref()),
                0.0,
                1.0,
            ),
            history: raw
                .history
                .as_ref()
                .map(|h| hourly_points(h, offset))
                .unwrap_or_default(),
        };

        tracing::debug!(
            location = %snapshot.location,
            points = snapshot.history.len(),
            "Built environment snapshot"
        );

        Ok(snapshot)
    }
}

/// Pass a reading through, warning when it falls outside its physical range.
fn checked(field: &str, value: Option<f64>, min: f64, max: f64) -> Option<f64> {
    if let Some(v) = value {
        if v < min || v > max {
            tracing::warn!(reading = field, value = v, min, max, "Reading outside expected range");
        }
    }
    value
}

/// Zip the parallel arrays into points. `time` defines the series; shorter
/// value arrays leave the trailing readings unknown.
fn hourly_points(history: &RawHistory, offset: FixedOffset) -> Vec<HourlyPoint> {
    history
        .time
        .iter()
        .enumerate()
        .filter_map(|(i, raw_time)| {
            let Some(timestamp) = parse_timestamp(raw_time, offset) else {
                tracing::debug!(index = i, value = %raw_time, "Skipping unparseable forecast time");
                return None;
            };
            Some(HourlyPoint {
                timestamp,
                temperature: numeric(history.temperature_2m.get(i)),
                wind_speed: numeric(history.windspeed_10m.get(i)),
                humidity: numeric(history.relative_humidity_2m.get(i)),
                precipitation: numeric(history.precipitation.get(i)),
            })
        })
        .collect()
}

/// Accepts RFC 3339, offset-less ISO 8601 local time (interpreted in
/// `offset`), or unix seconds.
fn parse_timestamp(raw: &Value, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    if let Some(secs) = raw.as_i64() {
        return DateTime::from_timestamp(secs, 0).map(|ts| ts.with_timezone(&offset));
    }

    let s = raw.as_str()?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts);
    }

    NAIVE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .and_then(|naive| naive.and_local_timezone(offset).single())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgroError;
    use serde_json::json;

    fn raw(value: Value) -> RawEnvironment {
        serde_json::from_value(value).unwrap()
    }

    fn sample_payload() -> Value {
        json!({
            "lat": 23.1,
            "lon": 88.5,
            "utc_offset_seconds": 19800,
            "temp_max": 31.4,
            "temp_min": 24.0,
            "humidity": 62,
            "wind_speed": 2.5,
            "rainfall": 0.0,
            "soil_moisture": 0.31,
            "history": {
                "time": ["2025-05-01T00:00", "2025-05-01T01:00", "2025-05-01T02:00"],
                "temperature_2m": [25.1, 24.6, 24.2],
                "windspeed_10m": [3.4, 2.1, 1.8]
            }
        })
    }

    #[test]
    fn builds_snapshot_from_location_payload() {
        let snapshot = EnvironmentSnapshot::from_raw(&raw(sample_payload())).unwrap();

        assert_eq!(snapshot.location, Location { lat: 23.1, lon: 88.5 });
        assert_eq!(snapshot.temp_max, Some(31.4));
        assert_eq!(snapshot.humidity, Some(62.0));
        assert_eq!(snapshot.rainfall, Some(0.0));
        assert_eq!(snapshot.soil_moisture, Some(0.31));
        assert_eq!(snapshot.temperature, None);
        assert_eq!(snapshot.history.len(), 3);

        let first = &snapshot.history[0];
        assert_eq!(first.timestamp.offset().local_minus_utc(), 19800);
        assert_eq!(first.timestamp.to_rfc3339(), "2025-05-01T00:00:00+05:30");
        assert_eq!(first.temperature, Some(25.1));
        assert_eq!(first.wind_speed, Some(3.4));
    }

    #[test]
    fn non_numeric_values_are_missing_not_zero() {
        let snapshot = EnvironmentSnapshot::from_raw(&raw(json!({
            "lat": 10.0,
            "lon": 10.0,
            "humidity": "n/a",
            "wind_speed": null,
            "soil_moisture": true
        })))
        .unwrap();

        assert_eq!(snapshot.humidity, None);
        assert_eq!(snapshot.wind_speed, None);
        assert_eq!(snapshot.soil_moisture, None);
        assert_eq!(snapshot.temp_max, None);
        assert!(snapshot.history.is_empty());
    }

    #[test]
    fn out_of_range_readings_pass_through() {
        let snapshot = EnvironmentSnapshot::from_raw(&raw(json!({
            "lat": 10.0,
            "lon": 10.0,
            "soil_moisture": 1.4,
            "humidity": 120
        })))
        .unwrap();

        assert_eq!(snapshot.soil_moisture, Some(1.4));
        assert_eq!(snapshot.humidity, Some(120.0));
    }

    #[test]
    fn missing_coordinates_fail() {
        let result = EnvironmentSnapshot::from_raw(&raw(json!({ "temp_max": 30 })));
        assert!(matches!(result, Err(AgroError::InvalidLocation(_))));

        let result = EnvironmentSnapshot::from_raw(&raw(json!({ "lat": "23.1", "lon": 88.5 })));
        assert!(matches!(result, Err(AgroError::InvalidLocation(_))));

        let result = EnvironmentSnapshot::from_raw(&raw(json!({ "lat": 123.0, "lon": 88.5 })));
        assert!(matches!(result, Err(AgroError::InvalidLocation(_))));
    }

    #[test]
    fn short_value_arrays_stay_aligned() {
        let snapshot = EnvironmentSnapshot::from_raw(&raw(json!({
            "lat": 10.0,
            "lon": 10.0,
            "history": {
                "time": ["2025-05-01T00:00", "2025-05-01T01:00", "2025-05-01T02:00"],
                "temperature_2m": [20.0, "bad", 18.0],
                "windspeed_10m": [1.0]
            }
        })))
        .unwrap();

        let temps: Vec<_> = snapshot.history.iter().map(|p| p.temperature).collect();
        let winds: Vec<_> = snapshot.history.iter().map(|p| p.wind_speed).collect();
        assert_eq!(temps, vec![Some(20.0), None, Some(18.0)]);
        assert_eq!(winds, vec![Some(1.0), None, None]);
    }

    #[test]
    fn unparseable_times_are_skipped() {
        let snapshot = EnvironmentSnapshot::from_raw(&raw(json!({
            "lat": 10.0,
            "lon": 10.0,
            "history": {
                "time": ["2025-05-01T00:00", "yesterday", "2025-05-01T02:00:00Z"],
                "temperature_2m": [20.0, 19.0, 18.0],
                "windspeed_10m": [1.0, 1.0, 1.0]
            }
        })))
        .unwrap();

        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[1].temperature, Some(18.0));
        assert_eq!(
            snapshot.history[1].timestamp.to_rfc3339(),
            "2025-05-01T02:00:00+00:00"
        );
    }

    #[test]
    fn unix_timestamps_are_accepted() {
        let snapshot = EnvironmentSnapshot::from_raw(&raw(json!({
            "lat": 10.0,
            "lon": 10.0,
            "history": { "time": [1714521600], "temperature_2m": [20.0] }
        })))
        .unwrap();

        assert_eq!(
            snapshot.history[0].timestamp.to_rfc3339(),
            "2024-05-01T00:00:00+00:00"
        );
    }

    #[test]
    fn serialization_round_trip_preserves_absence() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("humidity");
        let snapshot = EnvironmentSnapshot::from_raw(&raw(payload)).unwrap();

        let encoded = serde_json::to_value(&snapshot).unwrap();
        assert!(encoded.get("humidity").is_none());
        assert_eq!(encoded["rainfall"], json!(0.0));
        assert_eq!(encoded["soil_moisture"], json!(0.31));

        let decoded: EnvironmentSnapshot = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.humidity, None);
    }
}
