//! End-to-end behaviour of the click-to-route session against a fixed
//! signal registry.

use signal_eta::config::PenaltyPolicy;
use signal_eta::routing::estimator::RouteDelayEstimator;
use signal_eta::routing::proximity::RouteProximityFilter;
use signal_eta::routing::route::{LatLng, RouteCandidate, RouteSegment};
use signal_eta::session::controller::{Completion, SessionController, Stage};
use signal_eta::session::display::{ConsoleDisplay, HeadlessMap, MarkerKind, RouteStyle, Surface};
use signal_eta::signals::registry::TrafficLightRegistry;
use signal_eta::signals::traffic_light::{LightColor, Signal, SignalId};

const START: LatLng = LatLng {
    lat: 35.7796,
    lng: -78.6382,
};
const END: LatLng = LatLng {
    lat: 35.7900,
    lng: -78.6500,
};

fn controller() -> SessionController<HeadlessMap, ConsoleDisplay> {
    SessionController::new(
        RouteDelayEstimator::default(),
        25.0,
        2,
        HeadlessMap::default(),
        ConsoleDisplay::default(),
    )
}

fn path() -> Vec<LatLng> {
    vec![START, LatLng::new(35.7850, -78.6440), END]
}

/// Clicks start and end, returning the request token.
fn select_points(c: &mut SessionController<HeadlessMap, ConsoleDisplay>) -> u64 {
    assert!(c.on_map_click(START).is_none());
    c.on_map_click(END).expect("second click issues a request").token
}

#[test]
fn red_light_on_first_point_adds_flat_penalty() {
    let registry = TrafficLightRegistry::from_signals(vec![Signal::with_state(
        SignalId(0),
        START,
        LightColor::Red,
        25,
    )]);
    let mut c = controller();
    let token = select_points(&mut c);
    let outcome = c.on_routes_received(
        token,
        Ok(vec![RouteCandidate::with_duration(path(), 120.0)]),
        &registry,
    );

    assert_eq!(outcome, Completion::Applied { candidates: 1 });
    assert_eq!(c.estimates()[0].total_seconds, 150.0);
    assert_eq!(c.display().text(Surface::CurrentEta), "2.5 min");
    assert_eq!(c.map().highlighted, vec![SignalId(0)]);
}

#[test]
fn two_candidates_are_compared_side_by_side() {
    let registry = TrafficLightRegistry::empty();
    let mut c = controller();
    let token = select_points(&mut c);
    c.on_routes_received(
        token,
        Ok(vec![
            RouteCandidate::with_duration(path(), 300.0),
            RouteCandidate::with_duration(vec![START, END], 360.0),
        ]),
        &registry,
    );

    assert_eq!(c.session().active_index, Some(0));
    assert_eq!(c.display().text(Surface::Route1), "Route 1: 5.0 min");
    assert_eq!(c.display().text(Surface::Route2), "Route 2: 6.0 min");
    assert_eq!(c.display().text(Surface::CurrentEta), "5.0 min");
    assert_eq!(c.map().routes[0].style, RouteStyle::Active);
    assert_eq!(c.map().routes[1].style, RouteStyle::Inactive);
}

#[test]
fn activating_the_alternative_switches_highlight_and_eta() {
    let registry = TrafficLightRegistry::empty();
    let mut c = controller();
    let token = select_points(&mut c);
    c.on_routes_received(
        token,
        Ok(vec![
            RouteCandidate::with_duration(path(), 300.0),
            RouteCandidate::with_duration(vec![START, END], 360.0),
        ]),
        &registry,
    );

    c.activate_route(1, &registry).unwrap();
    assert_eq!(c.session().active_index, Some(1));
    assert_eq!(c.display().text(Surface::CurrentEta), "6.0 min");
    assert_eq!(c.map().routes[0].style, RouteStyle::Inactive);
    assert_eq!(c.map().routes[1].style, RouteStyle::Active);
}

#[test]
fn out_of_range_activation_changes_nothing() {
    let registry = TrafficLightRegistry::empty();
    let mut c = controller();
    let token = select_points(&mut c);
    c.on_routes_received(
        token,
        Ok(vec![
            RouteCandidate::with_duration(path(), 300.0),
            RouteCandidate::with_duration(vec![START, END], 360.0),
        ]),
        &registry,
    );
    let before = c.session().clone();
    let texts: Vec<String> = Surface::ALL
        .iter()
        .map(|s| c.display().text(*s).to_string())
        .collect();

    let err = c.activate_route(5, &registry).unwrap_err();
    assert_eq!(err.index, 5);
    assert_eq!(err.available, 2);
    assert_eq!(c.session(), &before);
    for (surface, text) in Surface::ALL.iter().zip(texts) {
        assert_eq!(c.display().text(*surface), text);
    }
}

#[test]
fn clicks_never_skip_a_stage() {
    let mut c = controller();
    assert_eq!(c.session().stage, Stage::AwaitingStart);
    assert!(c.on_map_click(START).is_none());
    assert_eq!(c.session().stage, Stage::AwaitingEnd);
    assert_eq!(c.session().start_point, Some(START));
    assert_eq!(c.session().end_point, None);

    assert!(c.on_map_click(END).is_some());
    assert_eq!(c.session().stage, Stage::AwaitingStart);
    assert_eq!(
        c.map().markers,
        vec![(MarkerKind::Start, START), (MarkerKind::Destination, END)]
    );

    // A third click starts a fresh selection.
    assert!(c.on_map_click(END).is_none());
    assert_eq!(c.session().stage, Stage::AwaitingEnd);
    assert_eq!(c.session().start_point, Some(END));
    assert_eq!(c.map().markers, vec![(MarkerKind::Start, END)]);
}

#[test]
fn reset_twice_equals_reset_once() {
    let registry = TrafficLightRegistry::empty();
    let mut c = controller();
    let token = select_points(&mut c);
    c.on_routes_received(
        token,
        Ok(vec![RouteCandidate::with_duration(path(), 300.0)]),
        &registry,
    );

    c.reset();
    let once = c.session().clone();
    let texts_once: Vec<String> = Surface::ALL
        .iter()
        .map(|s| c.display().text(*s).to_string())
        .collect();
    c.reset();

    assert_eq!(c.session(), &once);
    assert_eq!(once.stage, Stage::AwaitingStart);
    assert!(once.candidates.is_empty());
    assert_eq!(once.active_index, None);
    for (surface, text) in Surface::ALL.iter().zip(texts_once) {
        assert_eq!(c.display().text(*surface), text);
        assert_eq!(text, surface.placeholder());
    }
    assert!(c.map().markers.is_empty());
    assert!(c.map().routes.is_empty());
    assert!(c.map().highlighted.is_empty());
}

#[test]
fn step_routes_use_road_class_speeds_and_live_countdown() {
    // Red light 9 m from the middle vertex, 18 s of red left.
    let near = LatLng::new(35.7850, -78.6441);
    let registry = TrafficLightRegistry::from_signals(vec![
        Signal::with_state(SignalId(0), near, LightColor::Red, 18),
        Signal::with_state(SignalId(1), LatLng::new(35.70, -78.70), LightColor::Red, 40),
    ]);
    let estimator =
        RouteDelayEstimator::new(PenaltyPolicy::LiveCountdown, RouteProximityFilter::default());
    let mut c = SessionController::new(
        estimator,
        25.0,
        0,
        HeadlessMap::default(),
        ConsoleDisplay::default(),
    );
    let token = select_points(&mut c);
    let route = RouteCandidate::with_segments(
        path(),
        vec![
            // One mile at 35 mph and one mile at 70 mph.
            RouteSegment {
                distance_meters: 1609.34,
                road_name: "Hillsborough Street".into(),
            },
            RouteSegment {
                distance_meters: 1609.34,
                road_name: "I-40".into(),
            },
        ],
    );
    c.on_routes_received(token, Ok(vec![route]), &registry);

    let eta = c.estimates()[0];
    let expected_base = 3600.0 / 35.0 + 3600.0 / 70.0;
    assert!((eta.base_seconds - expected_base).abs() < 1e-9);
    assert_eq!(eta.penalty_seconds, 18.0);
    assert_eq!(eta.red_signals, 1);
}

#[test]
fn empty_route_costs_only_red_lights() {
    let registry = TrafficLightRegistry::from_signals(vec![
        Signal::with_state(SignalId(0), START, LightColor::Red, 30),
        Signal::with_state(SignalId(1), START, LightColor::Green, 30),
    ]);
    let route = RouteCandidate::with_segments(vec![START], Vec::new());
    let eta = RouteDelayEstimator::default().estimate(&route, &registry, 25.0);
    assert_eq!(eta.base_seconds, 0.0);
    assert_eq!(eta.total_seconds, eta.penalty_seconds);
    assert_eq!(eta.total_seconds, 30.0);
}
