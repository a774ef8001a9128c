// benches/bench_route_proximity_filter.rs

use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use signal_eta::routing::proximity::RouteProximityFilter;
use signal_eta::routing::route::LatLng;
use signal_eta::signals::random::RngSource;
use signal_eta::signals::registry::TrafficLightRegistry;
use std::time::Duration;

// Signals scattered over a ~10 km square around downtown Raleigh.
fn create_registry(num_signals: usize) -> TrafficLightRegistry {
    let mut rng = SmallRng::seed_from_u64(1);
    let positions: Vec<LatLng> = (0..num_signals)
        .map(|_| {
            LatLng::new(
                rng.random_range(35.73..35.83),
                rng.random_range(-78.70..-78.58),
            )
        })
        .collect();
    TrafficLightRegistry::from_positions(&positions, &mut RngSource(SmallRng::seed_from_u64(2)))
}

// A diagonal route with a vertex roughly every 15 meters.
fn create_path(num_points: usize) -> Vec<LatLng> {
    (0..num_points)
        .map(|i| LatLng::new(35.74 + i as f64 * 0.0001, -78.69 + i as f64 * 0.0001))
        .collect()
}

fn bench_route_proximity_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_proximity_filter");

    group.sample_size(50);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    let path = create_path(800);
    for &size in [100, 500, 1000].iter() {
        let registry = create_registry(size);
        for &stride in [1, 5].iter() {
            let filter = RouteProximityFilter::new(stride);
            group.bench_function(format!("signals_{}_stride_{}", size, stride), |b| {
                b.iter(|| black_box(filter.select(&registry, &path, 25.0).len()));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_route_proximity_filter);
criterion_main!(benches);
