// controller.rs
//
// Two-click selection state machine. The first click places the start point,
// the second the destination and produces a routing request; routing results
// come back later through `on_routes_received`, tagged with the request
// token. Only the latest token is accepted.

use crate::config::SimulationConfig;
use crate::error::{InvalidSelectionError, RoutingRequestError};
use crate::global_variables::MAX_ROUTE_CANDIDATES;
use crate::routing::estimator::{format_minutes, EtaBreakdown, RouteDelayEstimator};
use crate::routing::proximity::RouteProximityFilter;
use crate::routing::route::{LatLng, RouteCandidate, RouteRequest};
use crate::session::display::{EtaDisplay, MapCanvas, MarkerKind, RouteStyle, Surface};
use crate::signals::registry::TrafficLightRegistry;
use crate::signals::traffic_light::SignalId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingStart,
    AwaitingEnd,
}

/// Per-user selection state.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub stage: Stage,
    pub start_point: Option<LatLng>,
    pub end_point: Option<LatLng>,
    pub candidates: Vec<RouteCandidate>,
    /// Always indexes into `candidates` when set.
    pub active_index: Option<usize>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            stage: Stage::AwaitingStart,
            start_point: None,
            end_point: None,
            candidates: Vec::new(),
            active_index: None,
        }
    }
}

/// What happened to a routing completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied { candidates: usize },
    /// Superseded by a newer request or a reset.
    Stale,
    Failed,
}

pub struct SessionController<M, D> {
    session: Session,
    request_token: u64,
    estimator: RouteDelayEstimator,
    threshold_meters: f64,
    alternatives: u8,
    estimates: Vec<EtaBreakdown>,
    map: M,
    display: D,
}

impl<M: MapCanvas, D: EtaDisplay> SessionController<M, D> {
    pub fn new(
        estimator: RouteDelayEstimator,
        threshold_meters: f64,
        alternatives: u8,
        map: M,
        mut display: D,
    ) -> Self {
        display.reset();
        Self {
            session: Session::default(),
            request_token: 0,
            estimator,
            threshold_meters,
            alternatives: alternatives.min(MAX_ROUTE_CANDIDATES as u8),
            estimates: Vec::new(),
            map,
            display,
        }
    }

    pub fn from_config(config: &SimulationConfig, map: M, display: D) -> Self {
        let estimator = RouteDelayEstimator::new(
            config.penalty_policy,
            RouteProximityFilter::new(config.sample_stride),
        );
        Self::new(
            estimator,
            config.threshold_meters,
            config.alternatives,
            map,
            display,
        )
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn request_token(&self) -> u64 {
        self.request_token
    }

    /// Estimates of every candidate, as last displayed.
    pub fn estimates(&self) -> &[EtaBreakdown] {
        &self.estimates
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    /// Handles a click on the map. Returns the routing request to issue once
    /// both points are known.
    pub fn on_map_click(&mut self, point: LatLng) -> Option<RouteRequest> {
        match self.session.stage {
            Stage::AwaitingStart => {
                self.reset();
                self.session.start_point = Some(point);
                self.map.place_marker(MarkerKind::Start, point);
                self.session.stage = Stage::AwaitingEnd;
                None
            }
            Stage::AwaitingEnd => {
                let start = self.session.start_point?;
                self.session.end_point = Some(point);
                self.map.place_marker(MarkerKind::Destination, point);
                self.session.stage = Stage::AwaitingStart;
                self.request_token += 1;
                Some(RouteRequest {
                    token: self.request_token,
                    start,
                    end: point,
                    alternatives: self.alternatives,
                })
            }
        }
    }

    /// Applies a routing completion if it answers the current request.
    pub fn on_routes_received(
        &mut self,
        token: u64,
        result: Result<Vec<RouteCandidate>, RoutingRequestError>,
        registry: &TrafficLightRegistry,
    ) -> Completion {
        if token != self.request_token {
            log::debug!(
                "Discarding routing result {} (current request is {})",
                token,
                self.request_token
            );
            return Completion::Stale;
        }
        let mut candidates = match result {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("Routing request {} failed: {}", token, e);
                return Completion::Failed;
            }
        };
        candidates.truncate(MAX_ROUTE_CANDIDATES);
        log::info!("Received {} route candidate(s)", candidates.len());
        if candidates.is_empty() {
            log::warn!("Routing service found no route");
        }

        self.session.active_index = if candidates.is_empty() { None } else { Some(0) };
        self.session.candidates = candidates;
        self.render_routes();
        self.refresh(registry);
        Completion::Applied {
            candidates: self.session.candidates.len(),
        }
    }

    /// Makes another candidate the active one. Out of range indexes change
    /// nothing.
    pub fn activate_route(
        &mut self,
        index: usize,
        registry: &TrafficLightRegistry,
    ) -> Result<(), InvalidSelectionError> {
        if index >= self.session.candidates.len() {
            return Err(InvalidSelectionError {
                index,
                available: self.session.candidates.len(),
            });
        }
        self.session.active_index = Some(index);
        self.render_routes();
        self.refresh(registry);
        Ok(())
    }

    /// Recomputes and redisplays the ETAs against the current signal states.
    pub fn refresh(&mut self, registry: &TrafficLightRegistry) {
        self.estimates = self
            .session
            .candidates
            .iter()
            .map(|c| self.estimator.estimate(c, registry, self.threshold_meters))
            .collect();

        let Some(active) = self.session.active_index else {
            return;
        };
        let eta = self.estimates[active];
        self.display
            .set_text(Surface::CurrentEta, &format_minutes(eta.total_seconds));

        if self.estimates.len() >= 2 {
            for (index, estimate) in self.estimates.iter().enumerate() {
                if let Some(surface) = Surface::for_route(index) {
                    self.display.set_text(
                        surface,
                        &format!("Route {}: {}", index + 1, format_minutes(estimate.total_seconds)),
                    );
                }
            }
        }

        let red_near_route: Vec<SignalId> = self
            .estimator
            .filter
            .select(registry, &self.session.candidates[active].path, self.threshold_meters)
            .into_iter()
            .filter(|s| s.is_red())
            .map(|s| s.id)
            .collect();
        self.map.highlight_signals(&red_near_route);
    }

    /// Clears points, candidates, overlays and text, and supersedes any
    /// outstanding routing request. Idempotent.
    pub fn reset(&mut self) {
        self.map.clear_markers();
        self.map.clear_routes();
        self.map.clear_highlights();
        self.display.reset();
        self.session = Session::default();
        self.estimates.clear();
        self.request_token += 1;
    }

    fn render_routes(&mut self) {
        self.map.clear_routes();
        for (index, candidate) in self.session.candidates.iter().enumerate() {
            let style = if Some(index) == self.session.active_index {
                RouteStyle::Active
            } else {
                RouteStyle::Inactive
            };
            self.map.draw_route(index, &candidate.path, style);
        }
        if let Some(active) = self.session.active_index {
            self.map.fit_bounds(&self.session.candidates[active].path);
        }
    }
}
