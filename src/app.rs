// app.rs
//
// The application instance. It owns the registry and the session controller
// and multiplexes three event sources on a single loop:
//   - the simulation timer,
//   - front-end events (clicks, route selection, reset),
//   - routing completions from spawned request tasks.
// Every handler runs to completion before the next one starts, so no signal
// or session is ever observed half-updated.

use crate::config::{SimulationConfig, TickPolicy};
use crate::error::RoutingRequestError;
use crate::monitoring::eta_log::EtaLog;
use crate::routing::route::{LatLng, RouteCandidate};
use crate::routing::service::RoutingService;
use crate::session::controller::{Completion, SessionController};
use crate::session::display::{EtaDisplay, MapCanvas};
use crate::signals::dataset::{self, DatasetSource};
use crate::signals::random::{RandomSource, RngSource};
use crate::signals::registry::TrafficLightRegistry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

type RoutingResult = Result<Vec<RouteCandidate>, RoutingRequestError>;

/// Input from the front-end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    Click(LatLng),
    ActivateRoute(usize),
    Reset,
    Status,
    Quit,
}

/// Parses one front-end command line.
///
/// `click <lat> <lng>`, `route <n>` (1-based), `reset`, `status`, `quit`.
pub fn parse_command(line: &str) -> Result<AppEvent, String> {
    let mut parts = line.split_whitespace();
    let command = parts.next().ok_or_else(|| "empty command".to_string())?;
    let mut number = |what: &str| -> Result<f64, String> {
        parts
            .next()
            .ok_or_else(|| format!("missing {}", what))?
            .parse::<f64>()
            .map_err(|e| format!("invalid {}: {}", what, e))
    };
    match command.to_lowercase().as_str() {
        "click" => {
            let lat = number("latitude")?;
            let lng = number("longitude")?;
            Ok(AppEvent::Click(LatLng::new(lat, lng)))
        }
        "route" => {
            let n = number("route number")?;
            if n < 1.0 || n.fract() != 0.0 {
                return Err(format!("route number must be 1 or more, got {}", n));
            }
            Ok(AppEvent::ActivateRoute(n as usize - 1))
        }
        "reset" => Ok(AppEvent::Reset),
        "status" => Ok(AppEvent::Status),
        "quit" | "exit" => Ok(AppEvent::Quit),
        other => Err(format!("unknown command '{}'", other)),
    }
}

/// Loads the signal dataset. Any failure leaves the registry empty.
pub async fn load_registry(
    source: &DatasetSource,
    rng: &mut impl RandomSource,
) -> TrafficLightRegistry {
    let loaded = match dataset::fetch(source).await {
        Ok(raw) => TrafficLightRegistry::load(&raw, rng),
        Err(e) => Err(e),
    };
    match loaded {
        Ok(registry) => {
            let summary = registry.summary();
            log::info!(
                "Traffic lights loaded: {} ({} red, {} green)",
                registry.len(),
                summary.red,
                summary.green
            );
            registry
        }
        Err(e) => {
            log::warn!("Traffic light dataset unavailable, continuing without signals: {}", e);
            TrafficLightRegistry::empty()
        }
    }
}

pub struct Application<R, M, D> {
    registry: TrafficLightRegistry,
    controller: SessionController<M, D>,
    router: R,
    rng: RngSource<StdRng>,
    tick_policy: TickPolicy,
    eta_log: Option<EtaLog>,
}

impl<R, M, D> Application<R, M, D>
where
    R: RoutingService + Clone + Send + Sync + 'static,
    M: MapCanvas,
    D: EtaDisplay,
{
    pub fn new(
        config: &SimulationConfig,
        registry: TrafficLightRegistry,
        router: R,
        map: M,
        display: D,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            registry,
            controller: SessionController::from_config(config, map, display),
            router,
            rng: RngSource(rng),
            tick_policy: config.tick_policy,
            eta_log: config.eta_log.clone().map(EtaLog::new),
        }
    }

    pub fn registry(&self) -> &TrafficLightRegistry {
        &self.registry
    }

    pub fn controller(&self) -> &SessionController<M, D> {
        &self.controller
    }

    /// Advances the signals by one period and refreshes the displayed ETAs.
    pub fn on_tick(&mut self) {
        if self.registry.is_empty() {
            return;
        }
        match self.tick_policy {
            TickPolicy::GlobalToggle { .. } => self.registry.toggle_all(&mut self.rng),
            TickPolicy::PerLight { .. } => {
                // Same clamped period the timer fires at.
                let period = self.tick_policy.period().as_secs();
                let elapsed = u32::try_from(period).unwrap_or(u32::MAX);
                let changed = self.registry.tick_all(elapsed, &mut self.rng);
                log::debug!("{} signal(s) changed color", changed);
            }
        }
        self.controller.map_mut().repaint_signals(self.registry.all());
        if self.controller.session().active_index.is_some() {
            self.controller.refresh(&self.registry);
            self.record_estimates();
        }
    }

    fn on_completion(&mut self, token: u64, result: RoutingResult) {
        let completion = self
            .controller
            .on_routes_received(token, result, &self.registry);
        if let Completion::Applied { .. } = completion {
            self.record_estimates();
        }
    }

    fn handle_event(
        &mut self,
        event: AppEvent,
        completions: &mpsc::UnboundedSender<(u64, RoutingResult)>,
    ) {
        match event {
            AppEvent::Click(point) => {
                if let Some(request) = self.controller.on_map_click(point) {
                    log::info!(
                        "Requesting route {} from ({:.5}, {:.5}) to ({:.5}, {:.5})",
                        request.token,
                        request.start.lat,
                        request.start.lng,
                        request.end.lat,
                        request.end.lng
                    );
                    let router = self.router.clone();
                    let completions = completions.clone();
                    tokio::spawn(async move {
                        let result = router.route(request).await;
                        let _ = completions.send((request.token, result));
                    });
                }
            }
            AppEvent::ActivateRoute(index) => {
                match self.controller.activate_route(index, &self.registry) {
                    Ok(()) => self.record_estimates(),
                    Err(e) => log::debug!("Ignoring route selection: {}", e),
                }
            }
            AppEvent::Reset => self.controller.reset(),
            AppEvent::Status => self.log_status(),
            AppEvent::Quit => {}
        }
    }

    fn record_estimates(&self) {
        if let Some(eta_log) = &self.eta_log {
            eta_log.record_all(
                self.controller.estimates(),
                self.controller.session().active_index,
            );
        }
    }

    fn log_status(&self) {
        let summary = self.registry.summary();
        let session = self.controller.session();
        log::info!(
            "Stage {:?}, {} candidate(s), active {:?}; signals {} red / {} green",
            session.stage,
            session.candidates.len(),
            session.active_index,
            summary.red,
            summary.green
        );
        for (index, eta) in self.controller.estimates().iter().enumerate() {
            log::info!(
                "Route {}: base {:.0}s + {} red light(s) {:.0}s = {:.1} min",
                index + 1,
                eta.base_seconds,
                eta.red_signals,
                eta.penalty_seconds,
                eta.minutes()
            );
        }
    }

    /// Runs until `Quit` arrives or the event channel closes.
    pub async fn run(&mut self, mut events: mpsc::Receiver<AppEvent>) {
        let (completions_tx, mut completions_rx) = mpsc::unbounded_channel();
        let period = self.tick_policy.period();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        log::info!("Simulation running, signals advance every {:?}", period);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.on_tick(),
                Some((token, result)) = completions_rx.recv() => self.on_completion(token, result),
                event = events.recv() => match event {
                    Some(AppEvent::Quit) | None => break,
                    Some(event) => self.handle_event(event, &completions_tx),
                },
            }
        }
        log::info!("Simulation stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutingConfig;
    use crate::routing::service::Router;
    use crate::session::display::{ConsoleDisplay, HeadlessMap};
    use crate::signals::traffic_light::{LightColor, Signal, SignalId};

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_command("click 35.7796 -78.6382"),
            Ok(AppEvent::Click(LatLng::new(35.7796, -78.6382)))
        );
        assert_eq!(parse_command("route 2"), Ok(AppEvent::ActivateRoute(1)));
        assert_eq!(parse_command("  RESET "), Ok(AppEvent::Reset));
        assert_eq!(parse_command("exit"), Ok(AppEvent::Quit));
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(parse_command("").is_err());
        assert!(parse_command("click 35.0").is_err());
        assert!(parse_command("click north west").is_err());
        assert!(parse_command("route 0").is_err());
        assert!(parse_command("fly").is_err());
    }

    fn per_light_app(period_secs: u64) -> Application<Router, HeadlessMap, ConsoleDisplay> {
        let config = SimulationConfig {
            tick_policy: TickPolicy::PerLight { period_secs },
            routing: RoutingConfig::osrm(),
            ..SimulationConfig::default()
        };
        let registry = TrafficLightRegistry::from_signals(vec![Signal::with_state(
            SignalId(0),
            LatLng::new(35.78, -78.64),
            LightColor::Red,
            20,
        )]);
        Application::new(
            &config,
            registry,
            Router::from_config(&config.routing),
            HeadlessMap::default(),
            ConsoleDisplay::default(),
            Some(3),
        )
    }

    #[test]
    fn per_light_tick_counts_down_by_the_period() {
        let mut app = per_light_app(5);
        app.on_tick();
        assert_eq!(app.registry().all()[0].countdown(), 15);
        assert_eq!(app.controller().map().red_signals, 1);
    }

    #[test]
    fn zero_period_still_advances_the_lights() {
        let mut app = per_light_app(0);
        assert_eq!(app.tick_policy.period(), std::time::Duration::from_secs(1));
        app.on_tick();
        assert_eq!(app.registry().all()[0].countdown(), 19);
        for _ in 0..19 {
            app.on_tick();
        }
        assert_eq!(app.registry().all()[0].color(), LightColor::Green);
    }

    #[tokio::test]
    async fn unreadable_dataset_gives_empty_registry() {
        let mut rng = RngSource(StdRng::seed_from_u64(1));
        let source = DatasetSource::File("/nonexistent/lights.geojson".into());
        assert!(load_registry(&source, &mut rng).await.is_empty());
    }
}
