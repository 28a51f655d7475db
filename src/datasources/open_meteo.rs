use crate::config::OpenMeteoConfig;
use crate::error::{AgroError, Result};
use crate::models::{Location, RawEnvironment, RawHistory};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const HOURLY_VARIABLES: &str =
    "temperature_2m,relative_humidity_2m,windspeed_10m,precipitation,soil_moisture_0_1cm";

pub struct OpenMeteoClient {
    client: reqwest::Client,
    config: OpenMeteoConfig,
}

// Open-Meteo forecast response structures
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    utc_offset_seconds: i64,
    #[serde(default)]
    hourly: HourlySeries,
}

#[derive(Debug, Default, Deserialize)]
struct HourlySeries {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default, alias = "wind_speed_10m")]
    windspeed_10m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    soil_moisture_0_1cm: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    pub fn new(config: OpenMeteoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn forecast_url(&self, location: &Location) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&hourly={}&wind_speed_unit=ms&timezone=auto",
            self.config.base_url, location.lat, location.lon, HOURLY_VARIABLES
        )
    }

    /// Fetch the hourly forecast for `location` and reduce it to the
    /// location-data payload the snapshot builder consumes.
    pub async fn fetch_location_data(&self, location: &Location) -> Result<RawEnvironment> {
        let url = self.forecast_url(location);
        tracing::debug!(%url, "Requesting Open-Meteo forecast");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AgroError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgroError::DataSourceUnavailable(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        let forecast: ForecastResponse = response.json().await.map_err(|e| {
            AgroError::DataSourceUnavailable(format!("Failed to parse Open-Meteo response: {}", e))
        })?;

        Ok(summarize(forecast))
    }

    pub async fn test_connection(&self, location: &Location) -> Result<bool> {
        let response = self
            .client
            .get(self.forecast_url(location))
            .send()
            .await
            .map_err(|e| AgroError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        Ok(response.status().is_success())
    }
}

fn summarize(forecast: ForecastResponse) -> RawEnvironment {
    let hourly = forecast.hourly;

    let temps = || hourly.temperature_2m.iter().flatten().copied();
    let temp_max = temps().max_by(|a, b| a.total_cmp(b));
    let temp_min = temps().min_by(|a, b| a.total_cmp(b));

    RawEnvironment {
        latitude: Some(Value::from(forecast.latitude)),
        longitude: Some(Value::from(forecast.longitude)),
        utc_offset_seconds: Some(Value::from(forecast.utc_offset_seconds)),
        temp_max: temp_max.map(Value::from),
        temp_min: temp_min.map(Value::from),
        temperature: latest(&hourly.temperature_2m),
        humidity: latest(&hourly.relative_humidity_2m),
        wind_speed: latest(&hourly.windspeed_10m),
        // Precipitation expected over the first forecast hour
        rainfall: hourly.precipitation.first().copied().flatten().map(Value::from),
        soil_moisture: latest(&hourly.soil_moisture_0_1cm),
        history: Some(RawHistory {
            time: hourly.time.into_iter().map(Value::String).collect(),
            temperature_2m: to_values(&hourly.temperature_2m),
            windspeed_10m: to_values(&hourly.windspeed_10m),
            relative_humidity_2m: to_values(&hourly.relative_humidity_2m),
            precipitation: to_values(&hourly.precipitation),
        }),
    }
}

/// Last non-null value of a series
fn latest(series: &[Option<f64>]) -> Option<Value> {
    series.iter().rev().find_map(|v| *v).map(Value::from)
}

fn to_values(series: &[Option<f64>]) -> Vec<Value> {
    series
        .iter()
        .map(|v| v.map(Value::from).unwrap_or(Value::Null))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnvironmentSnapshot;
    use serde_json::json;

    fn sample_response() -> ForecastResponse {
        serde_json::from_value(json!({
            "latitude": 23.125,
            "longitude": 88.5,
            "utc_offset_seconds": 19800,
            "timezone": "Asia/Kolkata",
            "hourly_units": { "windspeed_10m": "m/s" },
            "hourly": {
                "time": ["2025-05-01T00:00", "2025-05-01T01:00", "2025-05-01T02:00"],
                "temperature_2m": [27.1, 26.4, null],
                "relative_humidity_2m": [78, 81, null],
                "windspeed_10m": [2.2, 1.9, null],
                "precipitation": [0.4, 0.0, 0.0],
                "soil_moisture_0_1cm": [0.29, null, null]
            }
        }))
        .unwrap()
    }

    #[test]
    fn summarizes_hourly_series() {
        let raw = summarize(sample_response());

        assert_eq!(raw.temp_max, Some(json!(27.1)));
        assert_eq!(raw.temp_min, Some(json!(26.4)));
        assert_eq!(raw.temperature, Some(json!(26.4)));
        assert_eq!(raw.humidity, Some(json!(81.0)));
        assert_eq!(raw.wind_speed, Some(json!(1.9)));
        assert_eq!(raw.rainfall, Some(json!(0.4)));
        assert_eq!(raw.soil_moisture, Some(json!(0.29)));

        let history = raw.history.as_ref().unwrap();
        assert_eq!(history.time.len(), 3);
        assert_eq!(history.temperature_2m[2], Value::Null);
    }

    #[test]
    fn summary_feeds_snapshot_builder() {
        let snapshot = EnvironmentSnapshot::from_raw(&summarize(sample_response())).unwrap();

        assert_eq!(snapshot.location, Location { lat: 23.125, lon: 88.5 });
        assert_eq!(snapshot.history.len(), 3);
        assert_eq!(snapshot.history[2].temperature, None);
        assert_eq!(
            snapshot.history[0].timestamp.to_rfc3339(),
            "2025-05-01T00:00:00+05:30"
        );
    }

    #[test]
    fn empty_hourly_block() {
        let response: ForecastResponse =
            serde_json::from_value(json!({ "latitude": 1.0, "longitude": 2.0 })).unwrap();
        let raw = summarize(response);
        assert_eq!(raw.temp_max, None);
        assert_eq!(raw.humidity, None);
        assert_eq!(raw.rainfall, None);
        assert!(raw.history.unwrap().time.is_empty());
    }

    #[test]
    fn forecast_url_requests_metric_wind() {
        let client = OpenMeteoClient::new(OpenMeteoConfig::default()).unwrap();
        let url = client.forecast_url(&Location { lat: 23.1, lon: 88.5 });
        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?latitude=23.1&longitude=88.5"));
        assert!(url.contains("wind_speed_unit=ms"));
        assert!(url.contains("soil_moisture_0_1cm"));
    }
}
