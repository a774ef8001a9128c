// benches/bench_route_delay_estimator.rs

use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use signal_eta::config::PenaltyPolicy;
use signal_eta::routing::estimator::RouteDelayEstimator;
use signal_eta::routing::proximity::RouteProximityFilter;
use signal_eta::routing::route::{LatLng, RouteCandidate, RouteSegment};
use signal_eta::signals::random::RngSource;
use signal_eta::signals::registry::TrafficLightRegistry;
use std::time::Duration;

const ROAD_NAMES: [&str; 4] = ["Glenwood Avenue", "I-440", "Capital Blvd", "US Hwy 70"];

// Route with one step per 20 vertices; every vertex also hosts a signal.
fn create_route(num_points: usize) -> (RouteCandidate, TrafficLightRegistry) {
    let path: Vec<LatLng> = (0..num_points)
        .map(|i| LatLng::new(35.74 + i as f64 * 0.0002, -78.69))
        .collect();
    let segments = (0..num_points / 20)
        .map(|i| RouteSegment {
            distance_meters: 440.0,
            road_name: ROAD_NAMES[i % ROAD_NAMES.len()].to_string(),
        })
        .collect();
    let registry =
        TrafficLightRegistry::from_positions(&path, &mut RngSource(SmallRng::seed_from_u64(9)));
    (RouteCandidate::with_segments(path, segments), registry)
}

fn bench_route_delay_estimator(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_delay_estimator");

    group.sample_size(50);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    let policies = [
        ("flat", PenaltyPolicy::default()),
        ("live", PenaltyPolicy::LiveCountdown),
    ];
    for &size in [100, 400].iter() {
        let (route, registry) = create_route(size);
        for (name, policy) in policies.iter() {
            let estimator = RouteDelayEstimator::new(*policy, RouteProximityFilter::default());
            group.bench_function(format!("points_{}_{}", size, name), |b| {
                b.iter(|| black_box(estimator.estimate(&route, &registry, 25.0).total_seconds));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_route_delay_estimator);
criterion_main!(benches);
