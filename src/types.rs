use serde::{Deserialize, Serialize};

// ** Coordinates **

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint { latitude, longitude }
    }

    // geo-types stores x = longitude, y = latitude
    pub fn to_coord(&self) -> geo::Coord<f64> {
        geo::Coord { x: self.longitude, y: self.latitude }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

impl From<geo::Coord<f64>> for GeoPoint {
    fn from(coord: geo::Coord<f64>) -> Self {
        GeoPoint { latitude: coord.y, longitude: coord.x }
    }
}

// A GPS fix recorded during live tracking. `timestamp` is in milliseconds since the epoch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: i64,
}

impl TrackedPoint {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingCoordinates {
    pub north_latitude: f64,
    pub south_latitude: f64,
    pub east_longitude: f64,
    pub west_longitude: f64,
}

impl BoundingCoordinates {
    // GeoJSON bbox order: [west, south, east, north].
    pub fn to_bbox(&self) -> Vec<f64> {
        vec![self.west_longitude, self.south_latitude, self.east_longitude, self.north_latitude]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    pub fn centered(center: GeoPoint, delta: f64) -> Self {
        MapRegion {
            latitude: center.latitude,
            longitude: center.longitude,
            latitude_delta: delta,
            longitude_delta: delta,
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn bounds(&self) -> BoundingCoordinates {
        let half_lat = self.latitude_delta / 2.0;
        let half_lng = self.longitude_delta / 2.0;
        BoundingCoordinates {
            north_latitude: self.latitude + half_lat,
            south_latitude: self.latitude - half_lat,
            east_longitude: self.longitude + half_lng,
            west_longitude: self.longitude - half_lng,
        }
    }
}

// ** Session attributes **

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindStrength {
    Calm,
    Light,
    Moderate,
    Strong,
}

impl WindStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindStrength::Calm => "calm",
            WindStrength::Light => "light",
            WindStrength::Moderate => "moderate",
            WindStrength::Strong => "strong",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationVisibility {
    Public,
    Region,
    #[default]
    Private,
}

// ** Catches **

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatchMarker {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CatchMarker {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_serializes_in_map_shape() {
        let region = MapRegion::centered(GeoPoint::new(45.5, 6.25), 0.005);
        let json = serde_json::to_value(region).unwrap();
        assert_eq!(json["latitude"], 45.5);
        assert_eq!(json["longitude"], 6.25);
        assert_eq!(json["latitudeDelta"], 0.005);
        assert_eq!(json["longitudeDelta"], 0.005);
    }

    #[test]
    fn test_region_bounds() {
        let region = MapRegion {
            latitude: 10.0,
            longitude: 20.0,
            latitude_delta: 2.0,
            longitude_delta: 4.0,
        };
        let bounds = region.bounds();
        assert_eq!(bounds.north_latitude, 11.0);
        assert_eq!(bounds.south_latitude, 9.0);
        assert_eq!(bounds.east_longitude, 22.0);
        assert_eq!(bounds.west_longitude, 18.0);
        assert_eq!(bounds.to_bbox(), vec![18.0, 9.0, 22.0, 11.0]);
    }

    #[test]
    fn test_enums_use_lowercase_names() {
        let strength: WindStrength = serde_json::from_str("\"moderate\"").unwrap();
        assert_eq!(strength, WindStrength::Moderate);
        assert_eq!(serde_json::to_string(&WindStrength::Calm).unwrap(), "\"calm\"");

        let visibility: LocationVisibility = serde_json::from_str("\"region\"").unwrap();
        assert_eq!(visibility, LocationVisibility::Region);
        assert_eq!(LocationVisibility::default(), LocationVisibility::Private);
    }

    #[test]
    fn test_route_json_shape() {
        let route: Vec<GeoPoint> =
            serde_json::from_str(r#"[{"latitude": 1.5, "longitude": 2.5}, {"latitude": 3.0, "longitude": 4.0}]"#).unwrap();
        assert_eq!(route, vec![GeoPoint::new(1.5, 2.5), GeoPoint::new(3.0, 4.0)]);
    }
}
