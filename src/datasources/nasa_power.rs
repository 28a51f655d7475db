use crate::config::NasaPowerConfig;
use crate::error::{AgroError, Result};
use crate::logic::energy::latest_positive_irradiance;
use crate::models::Location;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// All-sky surface shortwave downward irradiance (Wh/m² per hour)
const IRRADIANCE_PARAMETER: &str = "ALLSKY_SFC_SW_DWN";

/// One hourly irradiance measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrradianceSample {
    pub hour: DateTime<Utc>,
    pub wh_per_m2: f64,
}

pub struct NasaPowerClient {
    client: reqwest::Client,
    config: NasaPowerConfig,
}

// NASA POWER hourly point response structures
#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: PowerParameters,
}

#[derive(Debug, Deserialize)]
struct PowerParameters {
    #[serde(rename = "ALLSKY_SFC_SW_DWN", default)]
    allsky_sfc_sw_dwn: BTreeMap<String, f64>,
}

impl NasaPowerClient {
    pub fn new(config: NasaPowerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn hourly_url(&self, location: &Location, date: NaiveDate) -> String {
        let day = date.format("%Y%m%d");
        format!(
            "{}?start={}&end={}&latitude={}&longitude={}&parameters={}&community=re&time-standard=utc&format=JSON",
            self.config.base_url, day, day, location.lat, location.lon, IRRADIANCE_PARAMETER
        )
    }

    /// Fetch the hourly irradiance series for one day at `location`.
    pub async fn fetch_irradiance(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<BTreeMap<String, f64>> {
        let url = self.hourly_url(location, date);
        tracing::debug!(%url, "Requesting NASA POWER irradiance");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AgroError::DataSourceUnavailable(format!("NASA POWER: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgroError::DataSourceUnavailable(format!(
                "NASA POWER returned {}: {}",
                status, body
            )));
        }

        let power: PowerResponse = response.json().await.map_err(|e| {
            AgroError::DataSourceUnavailable(format!("Failed to parse NASA POWER response: {}", e))
        })?;

        Ok(power.properties.parameter.allsky_sfc_sw_dwn)
    }

    /// Latest hour of `date` with positive irradiance.
    pub async fn fetch_latest_irradiance(
        &self,
        location: &Location,
        date: NaiveDate,
    ) -> Result<IrradianceSample> {
        let series = self.fetch_irradiance(location, date).await?;
        latest_sample(&series).ok_or_else(|| {
            AgroError::DataSourceUnavailable(format!(
                "No positive irradiance reported for {} on {}",
                location, date
            ))
        })
    }

    pub async fn test_connection(&self, location: &Location, date: NaiveDate) -> Result<bool> {
        let response = self
            .client
            .get(self.hourly_url(location, date))
            .send()
            .await
            .map_err(|e| AgroError::DataSourceUnavailable(format!("NASA POWER: {}", e)))?;

        Ok(response.status().is_success())
    }
}

fn latest_sample(series: &BTreeMap<String, f64>) -> Option<IrradianceSample> {
    // Keys that don't parse as an hour are skipped rather than failing the series
    let valid = series.iter().filter(|(key, _)| parse_hour_key(key).is_some());
    let (key, wh_per_m2) = latest_positive_irradiance(valid)?;
    Some(IrradianceSample {
        hour: parse_hour_key(key)?,
        wh_per_m2,
    })
}

/// Parse a `YYYYMMDDHH` key into the start of that UTC hour.
fn parse_hour_key(key: &str) -> Option<DateTime<Utc>> {
    if key.len() != 10 || !key.is_ascii() {
        return None;
    }
    let date = NaiveDate::parse_from_str(&key[..8], "%Y%m%d").ok()?;
    let hour: u32 = key[8..].parse().ok()?;
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    Utc.from_local_datetime(&date.and_time(time)).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn parses_hour_keys() {
        let hour = parse_hour_key("2025050113").unwrap();
        assert_eq!(hour.to_rfc3339(), "2025-05-01T13:00:00+00:00");
        assert_eq!(parse_hour_key("2025050124"), None);
        assert_eq!(parse_hour_key("20250501"), None);
        assert_eq!(parse_hour_key("abcdefghij"), None);
    }

    #[test]
    fn latest_positive_hour_wins() {
        let s = series(&[
            ("2025050106", 120.0),
            ("2025050112", 845.5),
            ("2025050119", 0.0),
            ("2025050120", -999.0),
        ]);
        let sample = latest_sample(&s).unwrap();
        assert_eq!(sample.hour.to_rfc3339(), "2025-05-01T12:00:00+00:00");
        assert_eq!(sample.wh_per_m2, 845.5);
    }

    #[test]
    fn night_only_series_has_no_sample() {
        let s = series(&[("2025050100", 0.0), ("2025050101", -999.0)]);
        assert_eq!(latest_sample(&s), None);
        assert_eq!(latest_sample(&BTreeMap::new()), None);
    }

    #[test]
    fn deserializes_power_response() {
        let response: PowerResponse = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [88.5, 23.1, 12.0] },
            "properties": {
                "parameter": {
                    "ALLSKY_SFC_SW_DWN": { "2025050105": 12.5, "2025050106": 98.0 }
                }
            }
        }))
        .unwrap();
        assert_eq!(response.properties.parameter.allsky_sfc_sw_dwn.len(), 2);
    }

    #[test]
    fn hourly_url_covers_single_day() {
        let client = NasaPowerClient::new(NasaPowerConfig::default()).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let url = client.hourly_url(&Location { lat: 23.1, lon: 88.5 }, date);
        assert!(url.contains("start=20250501&end=20250501"));
        assert!(url.contains("parameters=ALLSKY_SFC_SW_DWN"));
        assert!(url.ends_with("format=JSON"));
    }
}
