use haversine_rs::point::Point;
use haversine_rs::units::Unit;

use crate::types::GeoPoint;

fn to_point(p: &GeoPoint) -> Point {
    Point { latitude: p.latitude, longitude: p.longitude }
}

// Haversine with R = 6371 km. Coordinates are not validated.
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_rs::distance(to_point(a), to_point(b), Unit::Kilometers)
}

pub fn distance_meters(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine_rs::distance(to_point(a), to_point(b), Unit::Meters)
}

pub fn total_distance_km(route: &[GeoPoint]) -> f64 {
    route
        .windows(2)
        .map(|pair| distance_km(&pair[0], &pair[1]))
        .sum()
}
