use crate::distance::{distance_km, distance_meters, total_distance_km};
use crate::types::{GeoPoint, TrackedPoint};

// Platform watch settings used for live session tracking.
pub const MIN_INTERVAL_MS: i64 = 5000;
pub const MIN_DISTANCE_M: f64 = 5.0;

#[derive(Clone, Copy, Debug)]
pub struct RecorderOptions {
    pub min_interval_ms: i64,
    pub min_distance_m: f64,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        RecorderOptions {
            min_interval_ms: MIN_INTERVAL_MS,
            min_distance_m: MIN_DISTANCE_M,
        }
    }
}

#[derive(Debug, Default)]
pub struct RouteRecorder {
    options: RecorderOptions,
    route: Vec<TrackedPoint>,
    tracking: bool,
    distance_km: f64,
}

impl RouteRecorder {
    pub fn new(options: RecorderOptions) -> Self {
        RouteRecorder {
            options,
            ..Default::default()
        }
    }

    pub fn start(&mut self, initial_route: Vec<TrackedPoint>) {
        let locations: Vec<GeoPoint> = initial_route.iter().map(|p| p.location()).collect();
        self.distance_km = total_distance_km(&locations);
        self.route = initial_route;
        self.tracking = true;
        log::info!("Tracking started with {} points", self.route.len());
    }

    // Stops tracking and discards the route.
    pub fn stop(&mut self) {
        log::info!("Tracking stopped after {} points, {:.3} km", self.route.len(), self.distance_km);
        self.tracking = false;
        self.route.clear();
        self.distance_km = 0.0;
    }

    pub fn record(&mut self, point: TrackedPoint) -> bool {
        if !self.tracking {
            return false;
        }
        if let Some(last) = self.route.last() {
            let elapsed_ms = point.timestamp - last.timestamp;
            let moved_m = distance_meters(&last.location(), &point.location());
            if elapsed_ms < self.options.min_interval_ms || moved_m < self.options.min_distance_m {
                log::debug!("Skipping fix after {} ms, {:.1} m", elapsed_ms, moved_m);
                return false;
            }
            self.distance_km += distance_km(&last.location(), &point.location());
        }
        self.route.push(point);
        true
    }

    pub fn route(&self) -> &[TrackedPoint] {
        &self.route
    }

    pub fn locations(&self) -> Vec<GeoPoint> {
        self.route.iter().map(|p| p.location()).collect()
    }

    pub fn last_point(&self) -> Option<&TrackedPoint> {
        self.route.last()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }
}
