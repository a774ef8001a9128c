use geo::Point;
use serde::{Deserialize, Serialize};

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Builds a coordinate from a GeoJSON `[lng, lat]` position.
    pub fn from_lng_lat(position: [f64; 2]) -> Self {
        Self {
            lat: position[1],
            lng: position[0],
        }
    }

    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lng, self.lat)
    }
}

/// One maneuver of a route, as reported by the routing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub distance_meters: f64,
    pub road_name: String,
}

/// One possible path between the selected points.
///
/// Produced fresh for every routing request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteCandidate {
    pub path: Vec<LatLng>,
    pub segments: Vec<RouteSegment>,
    /// Total duration when the provider reports it instead of per-step data.
    pub base_duration_seconds: Option<f64>,
}

impl RouteCandidate {
    pub fn with_segments(path: Vec<LatLng>, segments: Vec<RouteSegment>) -> Self {
        Self {
            path,
            segments,
            base_duration_seconds: None,
        }
    }

    pub fn with_duration(path: Vec<LatLng>, seconds: f64) -> Self {
        Self {
            path,
            segments: Vec::new(),
            base_duration_seconds: Some(seconds),
        }
    }
}

/// What the session asks of the routing service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Session token the result must echo back.
    pub token: u64,
    pub start: LatLng,
    pub end: LatLng,
    /// Total routes wanted, main route included. 0 and 1 both mean one route.
    pub alternatives: u8,
}
