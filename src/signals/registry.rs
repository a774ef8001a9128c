use crate::error::DataLoadError;
use crate::routing::route::LatLng;
use crate::signals::dataset;
use crate::signals::random::RandomSource;
use crate::signals::traffic_light::{Signal, SignalId};

/// Red/green split of the registry, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalSummary {
    pub red: usize,
    pub green: usize,
}

/// Every simulated signal in the area, in dataset order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficLightRegistry {
    signals: Vec<Signal>,
}

impl TrafficLightRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds one signal per dataset point. Duplicate positions are skipped so
    /// the registry stays unique by position.
    pub fn from_positions(positions: &[LatLng], rng: &mut impl RandomSource) -> Self {
        let mut signals: Vec<Signal> = Vec::with_capacity(positions.len());
        for &position in positions {
            if signals.iter().any(|s| s.position == position) {
                log::debug!("Skipping duplicate signal at {:?}", position);
                continue;
            }
            let id = SignalId(signals.len());
            signals.push(Signal::new(id, position, rng));
        }
        Self { signals }
    }

    /// Builds a registry from signals whose state is already known.
    pub fn from_signals(signals: Vec<Signal>) -> Self {
        Self { signals }
    }

    /// Parses a GeoJSON dataset into a registry.
    pub fn load(dataset: &str, rng: &mut impl RandomSource) -> Result<Self, DataLoadError> {
        let positions = dataset::parse_points(dataset)?;
        Ok(Self::from_positions(&positions, rng))
    }

    /// Calls `tick` on every signal. Returns how many changed color.
    pub fn tick_all(&mut self, elapsed_secs: u32, rng: &mut impl RandomSource) -> usize {
        let mut changed = 0;
        for signal in self.signals.iter_mut() {
            if signal.tick(elapsed_secs, rng) {
                changed += 1;
            }
        }
        changed
    }

    /// Flips every signal at once.
    pub fn toggle_all(&mut self, rng: &mut impl RandomSource) {
        for signal in self.signals.iter_mut() {
            signal.toggle(rng);
        }
    }

    pub fn all(&self) -> &[Signal] {
        &self.signals
    }

    pub fn get(&self, id: SignalId) -> Option<&Signal> {
        self.signals.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    pub fn summary(&self) -> SignalSummary {
        let red = self.signals.iter().filter(|s| s.is_red()).count();
        SignalSummary {
            red,
            green: self.signals.len() - red,
        }
    }
}
