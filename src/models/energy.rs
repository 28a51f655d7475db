use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Instantaneous renewable output at a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyReading {
    pub timestamp: DateTime<Utc>,
    pub solar_kw: f64,
    #[serde(default)]
    pub wind_kw: f64,
    #[serde(default)]
    pub hydro_kw: f64,
}

impl EnergyReading {
    pub fn solar(timestamp: DateTime<Utc>, solar_kw: f64) -> Self {
        Self {
            timestamp,
            solar_kw,
            wind_kw: 0.0,
            hydro_kw: 0.0,
        }
    }

    pub fn total_kw(&self) -> f64 {
        self.solar_kw + self.wind_kw + self.hydro_kw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    Surplus,
    Deficit,
    Balanced,
}

impl BalanceStatus {
    pub fn from_balance(balance_kwh: f64) -> Self {
        if balance_kwh > 0.0 {
            BalanceStatus::Surplus
        } else if balance_kwh < 0.0 {
            BalanceStatus::Deficit
        } else {
            BalanceStatus::Balanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::Surplus => "Surplus",
            BalanceStatus::Deficit => "Deficit",
            BalanceStatus::Balanced => "Balanced",
        }
    }
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyBalance {
    pub generation_kwh: f64,
    pub usage_kwh: f64,
    pub balance_kwh: f64,
    pub status: BalanceStatus,
}

/// Accounting window for avoided emissions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub fn days(&self) -> f64 {
        match self {
            Period::Daily => 1.0,
            Period::Weekly => 7.0,
            Period::Monthly => 30.0,
            Period::Yearly => 365.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Daily => "daily",
            Period::Weekly => "weekly",
            Period::Monthly => "monthly",
            Period::Yearly => "yearly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Some(Period::Daily),
            "weekly" | "week" => Some(Period::Weekly),
            "monthly" | "month" => Some(Period::Monthly),
            "yearly" | "year" | "annual" => Some(Period::Yearly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonParams {
    pub lat: f64,
    pub lon: f64,
    pub panel_size_m2: f64,
    pub efficiency: f64,
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiParams {
    pub capex: f64,
    pub panel_size_m2: f64,
    pub efficiency: f64,
    pub electricity_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialProjection {
    pub co2_avoided_kg: f64,
    pub payback_years: Option<f64>,
    pub yearly_savings: f64,
}

/// Solar output derived from a measured irradiance sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationEstimate {
    pub reading: EnergyReading,
    pub usage_kw: f64,
    pub co2_saved_kg: f64,
}
