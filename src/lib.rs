use log::Level;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use wasm_bindgen_futures::js_sys;

pub mod cluster;
pub mod distance;
pub mod exif;
pub mod format;
pub mod region;
pub mod tracking;
pub mod types;
pub mod weather;
pub mod wind;

pub use self::distance::{distance_km, total_distance_km};
pub use self::region::{compute_region, MapPreview};
pub use self::types::{GeoPoint, LocationVisibility, MapRegion, TrackedPoint, WindStrength};
pub use self::wind::wind_category;

use self::cluster::{cluster_markers, cluster_radius_for};
use self::exif::{photo_location, photo_taken_at, PhotoExif};
use self::tracking::RouteRecorder;
use self::types::CatchMarker;
use self::weather::{WeatherClient, WeatherConfig, WeatherIcon};

#[wasm_bindgen]
pub fn rust_init(level: Option<String>) {
    let level = level
        .as_deref()
        .and_then(|name| Level::from_str(name).ok())
        .unwrap_or(Level::Error);
    match console_log::init_with_level(level) {
        Ok(()) => log::info!("Logger initialized from library"),
        Err(e) => log::warn!("Logger already initialized: {}", e),
    }
}

// ** Parameters coming from the app **

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewParams {
    #[serde(default)]
    pub route: Vec<GeoPoint>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub location_visibility: Option<LocationVisibility>,
    #[serde(default)]
    pub force_show_detailed_location: bool,
}

impl PreviewParams {
    fn preview(&self) -> MapPreview {
        let fallback = match (self.location_lat, self.location_lng) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint::new(latitude, longitude)),
            _ => None,
        };
        MapPreview::build(
            &self.route,
            fallback,
            self.location_visibility.unwrap_or_default(),
            self.force_show_detailed_location,
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterParams {
    pub markers: Vec<CatchMarker>,
    pub radius_deg: Option<f64>,
    pub region: Option<MapRegion>,
}

#[derive(Deserialize)]
pub struct WeatherParams {
    pub config: WeatherConfig,
    pub latitude: f64,
    pub longitude: f64,
    pub date: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    pub location: Option<GeoPoint>,
    pub taken_at: Option<String>,
}

// ** JSON level operations, wrapped for JS below **

pub fn route_distance_json(route_json: &str) -> Result<f64, String> {
    let route: Vec<GeoPoint> = serde_json::from_str(route_json).map_err(|e| e.to_string())?;
    Ok(total_distance_km(&route))
}

pub fn map_preview_geojson_json(params_json: &str) -> Result<String, String> {
    let params: PreviewParams = serde_json::from_str(params_json).map_err(|e| e.to_string())?;
    let geojson = params.preview().to_geojson();
    serde_json::to_string(&geojson).map_err(|e| e.to_string())
}

pub fn cluster_catches_json(params_json: &str) -> Result<String, String> {
    let params: ClusterParams = serde_json::from_str(params_json).map_err(|e| e.to_string())?;
    let radius = params
        .radius_deg
        .or_else(|| params.region.as_ref().map(cluster_radius_for))
        .unwrap_or(0.0);
    let clusters = cluster_markers(&params.markers, radius);
    serde_json::to_string(&clusters).map_err(|e| e.to_string())
}

pub fn photo_metadata_json(exif_json: &str) -> Result<String, String> {
    let exif: PhotoExif = serde_json::from_str(exif_json).map_err(|e| e.to_string())?;
    let metadata = PhotoMetadata {
        location: photo_location(&exif),
        taken_at: photo_taken_at(&exif),
    };
    serde_json::to_string(&metadata).map_err(|e| e.to_string())
}

pub async fn fetch_weather_async(params_json: &str) -> Result<String, String> {
    let params: WeatherParams = serde_json::from_str(params_json).map_err(|e| e.to_string())?;
    let location = GeoPoint::new(params.latitude, params.longitude);
    let client = WeatherClient::new(params.config);

    let json = match params.date {
        Some(date) => {
            let day = client.history(&location, &date).await.map_err(|e| e.to_string())?;
            serde_json::to_string(&day)
        }
        None => {
            let report = client.current(&location).await.map_err(|e| e.to_string())?;
            serde_json::to_string(&report)
        }
    };
    json.map_err(|e| e.to_string())
}

// ** JS bindings **

#[wasm_bindgen(js_name = distanceKm)]
pub fn js_distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    distance_km(&GeoPoint::new(lat1, lng1), &GeoPoint::new(lat2, lng2))
}

#[wasm_bindgen(js_name = routeDistanceKm)]
pub fn js_route_distance_km(route_json: String) -> Result<f64, JsValue> {
    route_distance_json(&route_json).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = windStrength)]
pub fn js_wind_strength(speed_kmh: f64) -> String {
    wind_category(speed_kmh).as_str().to_string()
}

#[wasm_bindgen(js_name = weatherIcon)]
pub fn js_weather_icon(conditions: Option<String>) -> String {
    WeatherIcon::from_conditions(conditions.as_deref()).as_str().to_string()
}

#[wasm_bindgen(js_name = mapPreview)]
pub fn js_map_preview(params: JsValue) -> Result<JsValue, JsValue> {
    let params: PreviewParams = serde_wasm_bindgen::from_value(params)?;
    Ok(serde_wasm_bindgen::to_value(&params.preview())?)
}

#[wasm_bindgen(js_name = mapPreviewGeojson)]
pub fn js_map_preview_geojson(params: String) -> Result<String, JsValue> {
    map_preview_geojson_json(&params).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = clusterCatches)]
pub fn js_cluster_catches(params: String) -> Result<String, JsValue> {
    cluster_catches_json(&params).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = photoMetadata)]
pub fn js_photo_metadata(exif_json: String) -> Result<String, JsValue> {
    photo_metadata_json(&exif_json).map_err(|e| JsValue::from_str(&e))
}

#[wasm_bindgen(js_name = formatDuration)]
pub fn js_format_duration(total_minutes: Option<i32>) -> Option<String> {
    format::format_duration(total_minutes.map(i64::from))
}

#[wasm_bindgen(js_name = formatTime)]
pub fn js_format_time(total_seconds: u32) -> String {
    format::format_time(u64::from(total_seconds))
}

#[wasm_bindgen(js_name = formatDistance)]
pub fn js_format_distance(distance_km: f64) -> String {
    format::format_distance_km(distance_km)
}

#[wasm_bindgen]
#[derive(Default)]
pub struct SessionTracker {
    recorder: RouteRecorder,
}

#[wasm_bindgen]
impl SessionTracker {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SessionTracker {
        SessionTracker::default()
    }

    // `initial_route_json` is the stored route of a resumed session, or "[]".
    pub fn start(&mut self, initial_route_json: String) -> Result<(), JsValue> {
        let initial_route: Vec<TrackedPoint> =
            serde_json::from_str(&initial_route_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.recorder.start(initial_route);
        Ok(())
    }

    pub fn stop(&mut self) {
        self.recorder.stop();
    }

    // `timestamp` is milliseconds since the epoch, as given by the location API.
    pub fn record(&mut self, latitude: f64, longitude: f64, timestamp: f64) -> bool {
        self.recorder.record(TrackedPoint {
            latitude,
            longitude,
            timestamp: timestamp as i64,
        })
    }

    #[wasm_bindgen(js_name = isTracking)]
    pub fn is_tracking(&self) -> bool {
        self.recorder.is_tracking()
    }

    #[wasm_bindgen(js_name = distanceKm)]
    pub fn distance_km(&self) -> f64 {
        self.recorder.distance_km()
    }

    #[wasm_bindgen(js_name = routeJson)]
    pub fn route_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.recorder.route()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

#[wasm_bindgen(js_name = fetchWeather)]
pub fn js_fetch_weather(params: String) -> js_sys::Promise {
    future_to_promise(async move {
        match fetch_weather_async(&params).await {
            Ok(json) => Ok(JsValue::from_str(&json)),
            Err(e) => Err(JsValue::from_str(&e)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_distance_json() {
        let d = route_distance_json(r#"[{"latitude": 0.0, "longitude": 0.0}, {"latitude": 1.0, "longitude": 0.0}]"#)
            .unwrap();
        assert!((d - 111.2).abs() < 1.2);
        assert_eq!(route_distance_json("[]").unwrap(), 0.0);
        assert!(route_distance_json("not json").is_err());
    }

    #[test]
    fn test_preview_params_default_to_private() {
        let params: PreviewParams = serde_json::from_str(r#"{"locationLat": 45.0, "locationLng": 6.0}"#).unwrap();
        let preview = params.preview();
        assert_eq!(preview.marker, None);
        assert_eq!(preview.region.unwrap().latitude_delta, region::PRIVATE_DELTA);
    }

    #[test]
    fn test_preview_params_half_fallback_is_ignored() {
        let params: PreviewParams = serde_json::from_str(r#"{"locationLat": 45.0, "locationVisibility": "public"}"#).unwrap();
        assert_eq!(params.preview().region, None);
    }

    #[test]
    fn test_map_preview_geojson_json() {
        let json = map_preview_geojson_json(
            r#"{"route": [], "locationLat": 45.0, "locationLng": 6.0, "locationVisibility": "public"}"#,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["features"][0]["geometry"]["type"], "Point");
        assert_eq!(value["features"][0]["geometry"]["coordinates"][0], 6.0);
    }

    #[test]
    fn test_cluster_catches_json_uses_region_radius() {
        let params = r#"{
            "markers": [
                {"id": "a", "latitude": 45.0, "longitude": 6.0},
                {"id": "b", "latitude": 45.01, "longitude": 6.0}
            ],
            "region": {"latitude": 45.0, "longitude": 6.0, "latitudeDelta": 1.0, "longitudeDelta": 1.0}
        }"#;
        let clusters: serde_json::Value = serde_json::from_str(&cluster_catches_json(params).unwrap()).unwrap();
        assert_eq!(clusters.as_array().unwrap().len(), 1);
        assert_eq!(clusters[0]["count"], 2);
    }

    #[test]
    fn test_photo_metadata_json() {
        let json = photo_metadata_json(
            r#"{"GPSLatitude": 45.9, "GPSLongitude": 6.1, "GPSLongitudeRef": "E", "DateTimeOriginal": "2024:06:15 07:42:10"}"#,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["location"]["latitude"], 45.9);
        assert_eq!(value["takenAt"], "2024-06-15T07:42:10");

        let empty: serde_json::Value = serde_json::from_str(&photo_metadata_json("{}").unwrap()).unwrap();
        assert!(empty["location"].is_null());
    }

    #[test]
    fn test_session_tracker_resume() {
        let mut tracker = SessionTracker::new();
        tracker
            .start(r#"[{"latitude": 45.0, "longitude": 6.0, "timestamp": 0}]"#.to_string())
            .unwrap();
        assert!(tracker.is_tracking());
        assert!(tracker.record(45.001, 6.0, 6000.0));
        assert!(tracker.distance_km() > 0.1);

        let route: Vec<TrackedPoint> = serde_json::from_str(&tracker.route_json().unwrap()).unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route[1].timestamp, 6000);
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(js_weather_icon(Some("Pluie légère".to_string())), "rainy");
        assert_eq!(js_weather_icon(None), "cloud");
        assert_eq!(js_format_distance(12.347), "12.35 km");
        assert_eq!(js_format_time(3725), "01:02:05");
    }

    #[test]
    fn test_weather_params_decode() {
        let params: WeatherParams =
            serde_json::from_str(r#"{"config": {"api_key": "k"}, "latitude": 45.0, "longitude": 6.0}"#).unwrap();
        assert_eq!(params.config.base_url, weather::DEFAULT_BASE_URL);
        assert_eq!(params.date, None);
    }
}
