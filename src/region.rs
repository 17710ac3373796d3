use geo::{BoundingRect, LineString, Rect};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use serde::{Deserialize, Serialize};

use crate::types::{BoundingCoordinates, GeoPoint, LocationVisibility, MapRegion};

pub const DEFAULT_DELTA: f64 = 0.005;
pub const PRIVATE_DELTA: f64 = 0.2;
pub const PADDING_FACTOR: f64 = 1.05;
// Roughly 11 meters of latitude.
pub const MIN_SPAN: f64 = 0.0001;

// Longitudes are compared naively: a route crossing the antimeridian spans most of the globe.
pub fn bounding_box(route: &[GeoPoint]) -> Option<BoundingCoordinates> {
    let line: LineString<f64> = route.iter().map(|p| p.to_coord()).collect();
    let rect: Rect<f64> = line.bounding_rect()?;
    Some(BoundingCoordinates {
        north_latitude: rect.max().y,
        south_latitude: rect.min().y,
        east_longitude: rect.max().x,
        west_longitude: rect.min().x,
    })
}

// In privacy mode only the center is kept and both deltas become PRIVATE_DELTA.
pub fn compute_region(route: &[GeoPoint], privacy_mode: bool, fallback: Option<GeoPoint>) -> Option<MapRegion> {
    let single_delta = if privacy_mode { PRIVATE_DELTA } else { DEFAULT_DELTA };

    match route {
        [] => fallback.map(|point| MapRegion::centered(point, single_delta)),
        [point] => Some(MapRegion::centered(*point, single_delta)),
        _ => {
            let bounds = bounding_box(route)?;
            let mid_lat = (bounds.south_latitude + bounds.north_latitude) / 2.0;
            let mid_lng = (bounds.west_longitude + bounds.east_longitude) / 2.0;

            if privacy_mode {
                return Some(MapRegion::centered(GeoPoint::new(mid_lat, mid_lng), PRIVATE_DELTA));
            }

            let lat_span = ((bounds.north_latitude - bounds.south_latitude) * PADDING_FACTOR).max(MIN_SPAN);
            let lng_span = ((bounds.east_longitude - bounds.west_longitude) * PADDING_FACTOR).max(MIN_SPAN);

            // Square viewport: the larger span is used on both axes.
            let span = lat_span.max(lng_span);
            Some(MapRegion {
                latitude: mid_lat,
                longitude: mid_lng,
                latitude_delta: span,
                longitude_delta: span,
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapPreview {
    pub region: Option<MapRegion>,
    pub polyline: Option<Vec<GeoPoint>>,
    pub marker: Option<GeoPoint>,
}

impl MapPreview {
    // `force_detailed` is set when the viewer owns the session.
    pub fn build(
        route: &[GeoPoint],
        fallback: Option<GeoPoint>,
        visibility: LocationVisibility,
        force_detailed: bool,
    ) -> Self {
        let show_detailed = force_detailed || visibility == LocationVisibility::Public;
        let privacy_mode = !show_detailed && visibility == LocationVisibility::Private;

        let region = compute_region(route, privacy_mode, fallback);
        let polyline = if show_detailed && route.len() > 1 {
            Some(route.to_vec())
        } else {
            None
        };
        let marker = if show_detailed && route.is_empty() { fallback } else { None };

        log::debug!(
            "Map preview: visibility {:?}, detailed {}, privacy {}, region {:?}",
            visibility,
            show_detailed,
            privacy_mode,
            region
        );
        MapPreview { region, polyline, marker }
    }

    pub fn to_geojson(&self) -> GeoJson {
        let mut features = Vec::new();
        if let Some(polyline) = &self.polyline {
            let coordinates = polyline.iter().map(|p| p.to_vec()).collect();
            features.push(Feature {
                geometry: Some(Geometry::new(Value::LineString(coordinates))),
                ..Default::default()
            });
        }
        if let Some(marker) = &self.marker {
            features.push(Feature {
                geometry: Some(Geometry::new(Value::Point(marker.to_vec()))),
                ..Default::default()
            });
        }

        GeoJson::FeatureCollection(FeatureCollection {
            bbox: self.region.map(|region| region.bounds().to_bbox()),
            features,
            foreign_members: None,
        })
    }
}
