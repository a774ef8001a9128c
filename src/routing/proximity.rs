//! Picks the signals that sit on a route.
//!
//! Distances are geodesic (Haversine, meters), never raw degree deltas: a
//! degree of longitude shrinks with latitude, so a degree threshold means a
//! different radius across the dataset.

use crate::routing::route::LatLng;
use crate::signals::registry::TrafficLightRegistry;
use crate::signals::traffic_light::Signal;
use geo::{Closest, ClosestPoint, HaversineDistance, Line};

/// Haversine distance between two coordinates, in meters.
pub fn haversine_meters(a: LatLng, b: LatLng) -> f64 {
    a.to_point().haversine_distance(&b.to_point())
}

/// Distance from a point to the chord between two path vertices, in meters.
pub fn distance_to_chord_meters(point: LatLng, from: LatLng, to: LatLng) -> f64 {
    let target = point.to_point();
    let chord = Line::new(from.to_point(), to.to_point());
    match chord.closest_point(&target) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => target.haversine_distance(&p),
        Closest::Indeterminate => f64::INFINITY,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteProximityFilter {
    /// Check every Nth path vertex. 1 checks them all.
    pub sample_stride: usize,
}

impl Default for RouteProximityFilter {
    fn default() -> Self {
        Self { sample_stride: 1 }
    }
}

impl RouteProximityFilter {
    pub fn new(sample_stride: usize) -> Self {
        Self {
            sample_stride: sample_stride.max(1),
        }
    }

    /// Signals strictly closer than `threshold_meters` to the route, in
    /// registry order.
    pub fn select<'a>(
        &self,
        registry: &'a TrafficLightRegistry,
        route_path: &[LatLng],
        threshold_meters: f64,
    ) -> Vec<&'a Signal> {
        if route_path.is_empty() || threshold_meters.is_nan() || threshold_meters <= 0.0 {
            return Vec::new();
        }
        let samples = self.sample(route_path);
        let windows = if self.sample_stride > 1 {
            self.windows(route_path)
        } else {
            Vec::new()
        };
        registry
            .all()
            .iter()
            .filter(|signal| {
                samples
                    .iter()
                    .any(|&vertex| haversine_meters(signal.position, vertex) < threshold_meters)
                    || windows
                        .iter()
                        .any(|w| w.reaches(signal.position, threshold_meters))
            })
            .collect()
    }

    /// Indexes of the sampled vertices; the last vertex is always included.
    fn sample_indices(&self, len: usize) -> Vec<usize> {
        let stride = self.sample_stride.max(1);
        let mut indices: Vec<usize> = (0..len).step_by(stride).collect();
        if len > 0 && (len - 1) % stride != 0 {
            indices.push(len - 1);
        }
        indices
    }

    fn sample(&self, route_path: &[LatLng]) -> Vec<LatLng> {
        self.sample_indices(route_path.len())
            .into_iter()
            .map(|i| route_path[i])
            .collect()
    }

    fn windows<'p>(&self, route_path: &'p [LatLng]) -> Vec<Window<'p>> {
        self.sample_indices(route_path.len())
            .windows(2)
            .map(|pair| Window::new(&route_path[pair[0]..=pair[1]]))
            .collect()
    }
}

/// The stretch of path between two consecutive sampled vertices.
struct Window<'p> {
    vertices: &'p [LatLng],
    /// Farthest any skipped vertex lies from the chord.
    slack_meters: f64,
}

impl<'p> Window<'p> {
    fn new(vertices: &'p [LatLng]) -> Self {
        let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
        let slack_meters = vertices[1..vertices.len() - 1]
            .iter()
            .map(|&v| distance_to_chord_meters(v, first, last))
            .fold(0.0, f64::max);
        Self {
            vertices,
            slack_meters,
        }
    }

    /// Whether `position` is within `threshold_meters` of any original
    /// segment. The chord bounds the search: every segment stays within
    /// `slack_meters` of it.
    fn reaches(&self, position: LatLng, threshold_meters: f64) -> bool {
        let (first, last) = (self.vertices[0], self.vertices[self.vertices.len() - 1]);
        let chord = distance_to_chord_meters(position, first, last);
        // A degenerate chord (loop back to the same vertex) bounds nothing.
        if chord.is_finite() && chord >= threshold_meters + self.slack_meters {
            return false;
        }
        self.vertices
            .windows(2)
            .any(|seg| distance_to_chord_meters(position, seg[0], seg[1]) < threshold_meters)
    }
}

/// Convenience wrapper around a default (every vertex) filter.
pub fn select<'a>(
    registry: &'a TrafficLightRegistry,
    route_path: &[LatLng],
    threshold_meters: f64,
) -> Vec<&'a Signal> {
    RouteProximityFilter::default().select(registry, route_path, threshold_meters)
}
