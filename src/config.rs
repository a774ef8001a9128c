// config.rs
//
// Runtime configuration. Every field defaults to the constants in
// `global_variables`, so an empty JSON object is a valid config file.

use crate::global_variables::{
    DEFAULT_DATASET_PATH, DEFAULT_PROFILE, DEFAULT_THRESHOLD_METERS, GLOBAL_TOGGLE_PERIOD_SECS,
    MAX_ROUTE_CANDIDATES, ORS_API_KEY_ENV, OSRM_DEFAULT_URL, PER_LIGHT_TICK_PERIOD_SECS,
    RED_LIGHT_PENALTY_SECS,
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How red lights near a route add to its ETA.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PenaltyPolicy {
    /// A fixed number of seconds per red light.
    Flat { seconds: f64 },
    /// The remaining red time of each red light.
    LiveCountdown,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        PenaltyPolicy::Flat {
            seconds: RED_LIGHT_PENALTY_SECS,
        }
    }
}

/// How the simulation clock advances the signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickPolicy {
    /// Every signal flips together once per period.
    GlobalToggle { period_secs: u64 },
    /// Every signal counts down on its own timer, ticked once per period.
    PerLight { period_secs: u64 },
}

impl TickPolicy {
    pub fn global_toggle() -> Self {
        TickPolicy::GlobalToggle {
            period_secs: GLOBAL_TOGGLE_PERIOD_SECS,
        }
    }

    pub fn per_light() -> Self {
        TickPolicy::PerLight {
            period_secs: PER_LIGHT_TICK_PERIOD_SECS,
        }
    }

    pub fn period(&self) -> Duration {
        let secs = match *self {
            TickPolicy::GlobalToggle { period_secs } | TickPolicy::PerLight { period_secs } => {
                period_secs
            }
        };
        Duration::from_secs(secs.max(1))
    }
}

impl Default for TickPolicy {
    fn default() -> Self {
        TickPolicy::global_toggle()
    }
}

/// Which routing service answers route requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum RoutingConfig {
    OpenRouteService {
        /// Name of the environment variable holding the API key.
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default = "default_profile")]
        profile: String,
    },
    Osrm {
        #[serde(default = "default_osrm_url")]
        base_url: String,
        #[serde(default = "default_osrm_profile")]
        profile: String,
    },
}

fn default_api_key_env() -> String {
    ORS_API_KEY_ENV.to_string()
}

fn default_profile() -> String {
    DEFAULT_PROFILE.to_string()
}

fn default_osrm_url() -> String {
    OSRM_DEFAULT_URL.to_string()
}

fn default_osrm_profile() -> String {
    "driving".to_string()
}

impl RoutingConfig {
    pub fn osrm() -> Self {
        RoutingConfig::Osrm {
            base_url: default_osrm_url(),
            profile: default_osrm_profile(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        RoutingConfig::OpenRouteService {
            api_key_env: default_api_key_env(),
            profile: default_profile(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub threshold_meters: f64,
    pub sample_stride: usize,
    pub penalty_policy: PenaltyPolicy,
    pub tick_policy: TickPolicy,
    pub alternatives: u8,
    pub routing: RoutingConfig,
    /// File path or http(s) URL of the GeoJSON signal dataset.
    pub dataset: String,
    pub eta_log: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            threshold_meters: DEFAULT_THRESHOLD_METERS,
            sample_stride: 1,
            penalty_policy: PenaltyPolicy::default(),
            tick_policy: TickPolicy::default(),
            alternatives: MAX_ROUTE_CANDIDATES as u8,
            routing: RoutingConfig::default(),
            dataset: DEFAULT_DATASET_PATH.to_string(),
            eta_log: None,
        }
    }
}

impl SimulationConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: SimulationConfig = serde_json::from_str(&raw)?;
        config.alternatives = config.alternatives.min(MAX_ROUTE_CANDIDATES as u8);
        Ok(config)
    }
}
