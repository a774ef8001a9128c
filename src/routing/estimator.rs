// estimator.rs
//
// ETA = base travel time + red light penalty.
//
// Base travel time comes either from the provider's total duration or, when
// only per-step data is available, from a coarse two-speed heuristic keyed on
// the road name (70 mph for highway markers, 35 mph otherwise).

use crate::config::PenaltyPolicy;
use crate::global_variables::{
    HIGHWAY_MARKERS, HIGHWAY_SPEED_MPH, METERS_PER_MILE, STREET_SPEED_MPH,
};
use crate::routing::proximity::RouteProximityFilter;
use crate::routing::route::{RouteCandidate, RouteSegment};
use crate::signals::registry::TrafficLightRegistry;
use crate::signals::traffic_light::Signal;

/// Components of one ETA computation, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaBreakdown {
    pub base_seconds: f64,
    pub penalty_seconds: f64,
    pub red_signals: usize,
    pub total_seconds: f64,
}

impl EtaBreakdown {
    pub fn minutes(&self) -> f64 {
        self.total_seconds / 60.0
    }
}

/// Formats seconds as minutes with one decimal, e.g. "2.5 min".
pub fn format_minutes(seconds: f64) -> String {
    format!("{:.1} min", seconds / 60.0)
}

/// Speed, in mph, assumed for a road with this name.
pub fn speed_limit_mph(road_name: &str) -> f64 {
    let name = road_name.to_lowercase();
    if HIGHWAY_MARKERS.iter().any(|marker| name.contains(marker)) {
        HIGHWAY_SPEED_MPH
    } else {
        STREET_SPEED_MPH
    }
}

/// Travel time of a single segment at its classified speed.
pub fn segment_seconds(segment: &RouteSegment) -> f64 {
    let miles = segment.distance_meters / METERS_PER_MILE;
    miles / speed_limit_mph(&segment.road_name) * 3600.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteDelayEstimator {
    pub policy: PenaltyPolicy,
    pub filter: RouteProximityFilter,
}

impl Default for RouteDelayEstimator {
    fn default() -> Self {
        Self {
            policy: PenaltyPolicy::default(),
            filter: RouteProximityFilter::default(),
        }
    }
}

impl RouteDelayEstimator {
    pub fn new(policy: PenaltyPolicy, filter: RouteProximityFilter) -> Self {
        Self { policy, filter }
    }

    /// Provider duration when present, otherwise the per-segment heuristic.
    /// No segments and no duration is zero seconds.
    pub fn base_travel_seconds(&self, route: &RouteCandidate) -> f64 {
        match route.base_duration_seconds {
            Some(seconds) => seconds,
            None => route.segments.iter().map(segment_seconds).sum(),
        }
    }

    /// Penalty for the red signals among `filtered`.
    pub fn red_light_penalty(&self, filtered: &[&Signal]) -> f64 {
        filtered
            .iter()
            .filter(|signal| signal.is_red())
            .map(|signal| match self.policy {
                PenaltyPolicy::Flat { seconds } => seconds,
                PenaltyPolicy::LiveCountdown => signal.countdown() as f64,
            })
            .sum()
    }

    pub fn estimate(
        &self,
        route: &RouteCandidate,
        registry: &TrafficLightRegistry,
        threshold_meters: f64,
    ) -> EtaBreakdown {
        let base_seconds = self.base_travel_seconds(route);
        let filtered = self.filter.select(registry, &route.path, threshold_meters);
        let red_signals = filtered.iter().filter(|s| s.is_red()).count();
        let penalty_seconds = self.red_light_penalty(&filtered);
        EtaBreakdown {
            base_seconds,
            penalty_seconds,
            red_signals,
            total_seconds: base_seconds + penalty_seconds,
        }
    }
}
