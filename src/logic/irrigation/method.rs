use crate::config::IrrigationPolicy;
use crate::models::DeliveryMethod;

/// Field size (m²) above which drip lines stop being cost-effective
pub const SPRINKLER_AREA_THRESHOLD_M2: f64 = 1000.0;

pub fn select_delivery_method(area_size_m2: f64, policy: &IrrigationPolicy) -> DeliveryMethod {
    if area_size_m2 > policy.sprinkler_area_threshold_m2 {
        return DeliveryMethod::Sprinkler;
    }

    match policy.drip_only_below_m2 {
        Some(limit) if area_size_m2 < limit => DeliveryMethod::Drip,
        _ => DeliveryMethod::DripOrSprinkler,
    }
}
