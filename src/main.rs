use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use signal_eta::app::{load_registry, parse_command, AppEvent, Application};
use signal_eta::config::{PenaltyPolicy, RoutingConfig, SimulationConfig, TickPolicy};
use signal_eta::global_variables::{GLOBAL_TOGGLE_PERIOD_SECS, PER_LIGHT_TICK_PERIOD_SECS};
use signal_eta::routing::service::Router;
use signal_eta::session::display::{ConsoleDisplay, HeadlessMap};
use signal_eta::signals::dataset::DatasetSource;
use signal_eta::signals::random::RngSource;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Penalty {
    /// Fixed seconds per red light
    Flat,
    /// Remaining red time of each light
    Live,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Tick {
    /// All lights flip together
    Global,
    /// Every light runs its own countdown
    PerLight,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Provider {
    Ors,
    Osrm,
}

#[derive(Parser)]
#[command(name = "signal_eta")]
#[command(about = "Route ETA estimation against simulated traffic lights")]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Traffic light dataset (GeoJSON path or http(s) URL)
    #[arg(long)]
    dataset: Option<String>,

    /// Distance in meters under which a signal counts as on the route
    #[arg(long)]
    threshold: Option<f64>,

    /// Check every Nth route vertex
    #[arg(long)]
    stride: Option<usize>,

    #[arg(long, value_enum)]
    penalty: Option<Penalty>,

    /// Seconds per red light for the flat penalty
    #[arg(long)]
    penalty_seconds: Option<f64>,

    #[arg(long, value_enum)]
    tick: Option<Tick>,

    /// Seconds between simulation ticks
    #[arg(long)]
    tick_period: Option<u64>,

    #[arg(long, value_enum)]
    provider: Option<Provider>,

    /// OSRM base URL
    #[arg(long)]
    osrm_url: Option<String>,

    /// Total routes to ask for (0, 1 or 2); 0 and 1 both ask for one
    #[arg(long)]
    alternatives: Option<u8>,

    /// Append displayed ETAs to this CSV file
    #[arg(long)]
    eta_log: Option<PathBuf>,

    /// Seed for the signal simulation
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn into_config(self) -> Result<(SimulationConfig, Option<u64>), String> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::from_file(path)
                .map_err(|e| format!("cannot read config {}: {}", path.display(), e))?,
            None => SimulationConfig::default(),
        };
        if let Some(dataset) = self.dataset {
            config.dataset = dataset;
        }
        if let Some(threshold) = self.threshold {
            config.threshold_meters = threshold;
        }
        if let Some(stride) = self.stride {
            config.sample_stride = stride.max(1);
        }
        match (self.penalty, self.penalty_seconds) {
            (Some(Penalty::Live), _) => config.penalty_policy = PenaltyPolicy::LiveCountdown,
            (Some(Penalty::Flat), Some(seconds)) | (None, Some(seconds)) => {
                config.penalty_policy = PenaltyPolicy::Flat { seconds }
            }
            (Some(Penalty::Flat), None) => config.penalty_policy = PenaltyPolicy::default(),
            (None, None) => {}
        }
        config.tick_policy = match (self.tick, self.tick_period) {
            (Some(Tick::Global), period) => TickPolicy::GlobalToggle {
                period_secs: period.unwrap_or(GLOBAL_TOGGLE_PERIOD_SECS),
            },
            (Some(Tick::PerLight), period) => TickPolicy::PerLight {
                period_secs: period.unwrap_or(PER_LIGHT_TICK_PERIOD_SECS),
            },
            (None, Some(period)) => match config.tick_policy {
                TickPolicy::GlobalToggle { .. } => TickPolicy::GlobalToggle { period_secs: period },
                TickPolicy::PerLight { .. } => TickPolicy::PerLight { period_secs: period },
            },
            (None, None) => config.tick_policy,
        };
        match self.provider {
            Some(Provider::Ors) => config.routing = RoutingConfig::default(),
            Some(Provider::Osrm) => config.routing = RoutingConfig::osrm(),
            None => {}
        }
        if let (Some(url), RoutingConfig::Osrm { base_url, .. }) =
            (self.osrm_url, &mut config.routing)
        {
            *base_url = url;
        }
        if let Some(alternatives) = self.alternatives {
            if alternatives > 2 {
                return Err(format!("--alternatives must be 0, 1 or 2, got {}", alternatives));
            }
            config.alternatives = alternatives;
        }
        if let Some(path) = self.eta_log {
            config.eta_log = Some(path);
        }
        Ok((config, self.seed))
    }
}

/// Forwards stdin commands to the application.
async fn read_commands(events: mpsc::Sender<AppEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Commands: click <lat> <lng> | route <n> | reset | status | quit");
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(event) => {
                let quit = event == AppEvent::Quit;
                if events.send(event).await.is_err() || quit {
                    return;
                }
            }
            Err(e) => eprintln!("{}", e),
        }
    }
    let _ = events.send(AppEvent::Quit).await;
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let (config, seed) = match Cli::parse().into_config() {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let mut loader_rng = RngSource(match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    });
    let registry = load_registry(&DatasetSource::parse(&config.dataset), &mut loader_rng).await;
    let router = Router::from_config(&config.routing);

    let mut app = Application::new(
        &config,
        registry,
        router,
        HeadlessMap::default(),
        ConsoleDisplay::default(),
        seed.map(|s| s.wrapping_add(1)),
    );

    let (events_tx, events_rx) = mpsc::channel(32);
    tokio::spawn(read_commands(events_tx));
    app.run(events_rx).await;
}
