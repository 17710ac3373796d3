use crate::types::WindStrength;

pub const LIGHT_WIND_KMH: f64 = 5.0;
pub const MODERATE_WIND_KMH: f64 = 20.0;
pub const STRONG_WIND_KMH: f64 = 40.0;

// Lower bounds are inclusive. NaN fails every comparison and ends up Strong.
pub fn wind_category(speed_kmh: f64) -> WindStrength {
    if speed_kmh < LIGHT_WIND_KMH {
        WindStrength::Calm
    } else if speed_kmh < MODERATE_WIND_KMH {
        WindStrength::Light
    } else if speed_kmh < STRONG_WIND_KMH {
        WindStrength::Moderate
    } else {
        WindStrength::Strong
    }
}
