use crate::config::IrrigationPolicy;
use crate::models::HourlyPoint;
use chrono::{DateTime, FixedOffset};

/// Wind speed (m/s) at or above which spray drift rules an hour out
pub const CALM_WIND_THRESHOLD_MS: f64 = 3.0;

/// Pick the coolest calm hour of the forecast.
///
/// An hour is eligible when both temperature and wind are known finite values
/// and the wind
/// is strictly below `policy.calm_wind_threshold_ms`. Among eligible hours the
/// lowest temperature wins; equal temperatures resolve to the earliest
/// timestamp, so the choice does not depend on the order of `history`.
pub fn select_optimal_window(
    history: &[HourlyPoint],
    policy: &IrrigationPolicy,
) -> Option<DateTime<FixedOffset>> {
    let mut best: Option<(f64, DateTime<FixedOffset>)> = None;

    for point in history {
        let (Some(temp), Some(wind)) = (point.temperature, point.wind_speed) else {
            continue;
        };
        if !temp.is_finite() || !wind.is_finite() || wind >= policy.calm_wind_threshold_ms {
            continue;
        }

        let better = match best {
            None => true,
            Some((best_temp, best_time)) => {
                temp < best_temp || (temp == best_temp && point.timestamp < best_time)
            }
        };
        if better {
            best = Some((temp, point.timestamp));
        }
    }

    best.map(|(_, time)| time)
}
