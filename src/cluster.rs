use geo::{Centroid, MultiPoint, Point};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::Serialize;

use crate::types::{CatchMarker, GeoPoint, MapRegion};

// Cluster radius as a share of the visible width: 40 units on a 512 unit tile.
pub const RADIUS_FRACTION: f64 = 40.0 / 512.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cluster {
    pub center: GeoPoint,
    pub count: usize,
    pub ids: Vec<String>,
}

// Markers are indexed in plain lat/lng degrees, so envelope and distance agree.
struct IndexedMarker {
    index: usize,
    position: [f64; 2],
}

impl RTreeObject for IndexedMarker {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for IndexedMarker {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d_lat = self.position[0] - point[0];
        let d_lng = self.position[1] - point[1];
        d_lat * d_lat + d_lng * d_lng
    }
}

pub fn cluster_radius_for(region: &MapRegion) -> f64 {
    region.longitude_delta * RADIUS_FRACTION
}

// Each unassigned marker, in input order, seeds a cluster with the unassigned markers in range.
pub fn cluster_markers(markers: &[CatchMarker], radius_deg: f64) -> Vec<Cluster> {
    // NaN and negative radii only merge exact duplicates
    let radius = if radius_deg > 0.0 { radius_deg } else { 0.0 };

    let tree = RTree::bulk_load(
        markers
            .iter()
            .enumerate()
            .map(|(index, marker)| IndexedMarker {
                index,
                position: [marker.latitude, marker.longitude],
            })
            .collect(),
    );

    let mut assigned = vec![false; markers.len()];
    let mut clusters = Vec::new();

    for (seed, marker) in markers.iter().enumerate() {
        if assigned[seed] {
            continue;
        }
        let mut members: Vec<usize> = tree
            .locate_within_distance([marker.latitude, marker.longitude], radius * radius)
            .map(|candidate| candidate.index)
            .filter(|index| !assigned[*index])
            .collect();
        members.sort_unstable();
        for index in &members {
            assigned[*index] = true;
        }

        let points: MultiPoint<f64> = members
            .iter()
            .map(|index| Point::new(markers[*index].longitude, markers[*index].latitude))
            .collect();
        let center = points
            .centroid()
            .map(|c| GeoPoint::from(c.0))
            .unwrap_or_else(|| marker.location());

        clusters.push(Cluster {
            center,
            count: members.len(),
            ids: members.iter().map(|index| markers[*index].id.clone()).collect(),
        });
    }

    log::info!("Clustered {} markers into {} clusters", markers.len(), clusters.len());
    clusters
}
