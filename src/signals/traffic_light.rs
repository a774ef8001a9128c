use crate::global_variables::{GREEN_COUNTDOWN_RANGE, RED_COUNTDOWN_RANGE};
use crate::routing::route::LatLng;
use crate::signals::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightColor {
    Red,
    Green,
}

impl LightColor {
    pub fn flipped(self) -> Self {
        match self {
            LightColor::Red => LightColor::Green,
            LightColor::Green => LightColor::Red,
        }
    }

    /// Inclusive countdown bounds, in seconds, for a fresh phase of this color.
    pub fn countdown_range(self) -> (u32, u32) {
        match self {
            LightColor::Red => RED_COUNTDOWN_RANGE,
            LightColor::Green => GREEN_COUNTDOWN_RANGE,
        }
    }
}

/// A simulated traffic light (node of the registry).
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    /// Index of the signal in the registry.
    pub id: SignalId,
    /// Geographic position of the signal.
    pub position: LatLng,
    /// Current color.
    color: LightColor,
    /// Seconds left in the current phase.
    countdown: u32,
}

impl Signal {
    /// Creates a signal with a random color and a countdown drawn for that color.
    pub fn new(id: SignalId, position: LatLng, rng: &mut impl RandomSource) -> Self {
        let color = if rng.coin_flip() {
            LightColor::Red
        } else {
            LightColor::Green
        };
        let countdown = Self::draw_countdown(color, rng);
        Self {
            id,
            position,
            color,
            countdown,
        }
    }

    /// Creates a signal in a known state.
    pub fn with_state(id: SignalId, position: LatLng, color: LightColor, countdown: u32) -> Self {
        Self {
            id,
            position,
            color,
            countdown,
        }
    }

    pub fn color(&self) -> LightColor {
        self.color
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn is_red(&self) -> bool {
        self.color == LightColor::Red
    }

    /// Advances the signal clock. When the countdown runs out the color flips
    /// and a fresh countdown is drawn for the new color.
    ///
    /// Returns true if the color changed.
    pub fn tick(&mut self, elapsed_secs: u32, rng: &mut impl RandomSource) -> bool {
        self.countdown = self.countdown.saturating_sub(elapsed_secs);
        if self.countdown == 0 {
            self.toggle(rng);
            true
        } else {
            false
        }
    }

    /// Flips the color unconditionally and restarts the countdown.
    pub fn toggle(&mut self, rng: &mut impl RandomSource) {
        self.color = self.color.flipped();
        self.countdown = Self::draw_countdown(self.color, rng);
    }

    fn draw_countdown(color: LightColor, rng: &mut impl RandomSource) -> u32 {
        let (low, high) = color.countdown_range();
        rng.range_inclusive(low, high)
    }
}
