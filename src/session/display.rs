//! Map and text collaborators of the session.
//!
//! The traits are what the session needs from a front-end; the headless
//! implementations keep the same state a browser map would and report it
//! through the log.

use crate::global_variables::ETA_PLACEHOLDER;
use crate::routing::route::LatLng;
use crate::signals::traffic_light::{LightColor, Signal, SignalId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    Destination,
}

impl MarkerKind {
    pub fn label(self) -> &'static str {
        match self {
            MarkerKind::Start => "Start",
            MarkerKind::Destination => "Destination",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStyle {
    Active,
    Inactive,
}

/// Text surfaces of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    CurrentEta,
    Route1,
    Route2,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::CurrentEta, Surface::Route1, Surface::Route2];

    /// Surface showing the comparison line for the candidate at `index`.
    pub fn for_route(index: usize) -> Option<Surface> {
        match index {
            0 => Some(Surface::Route1),
            1 => Some(Surface::Route2),
            _ => None,
        }
    }

    pub fn placeholder(self) -> String {
        match self {
            Surface::CurrentEta => ETA_PLACEHOLDER.to_string(),
            Surface::Route1 => format!("Route 1: {}", ETA_PLACEHOLDER),
            Surface::Route2 => format!("Route 2: {}", ETA_PLACEHOLDER),
        }
    }
}

pub trait MapCanvas {
    fn place_marker(&mut self, kind: MarkerKind, at: LatLng);
    fn clear_markers(&mut self);
    fn draw_route(&mut self, index: usize, path: &[LatLng], style: RouteStyle);
    fn clear_routes(&mut self);
    fn fit_bounds(&mut self, path: &[LatLng]);
    fn highlight_signals(&mut self, signals: &[SignalId]);
    fn clear_highlights(&mut self);
    /// Redraws signal colors after the simulation advanced.
    fn repaint_signals(&mut self, signals: &[Signal]);
}

pub trait EtaDisplay {
    fn set_text(&mut self, surface: Surface, text: &str);

    fn reset(&mut self) {
        for surface in Surface::ALL {
            self.set_text(surface, &surface.placeholder());
        }
    }
}

/// Bounding box as (south-west, north-east).
pub fn bounds(path: &[LatLng]) -> Option<(LatLng, LatLng)> {
    let first = *path.first()?;
    Some(path.iter().fold((first, first), |(sw, ne), p| {
        (
            LatLng::new(sw.lat.min(p.lat), sw.lng.min(p.lng)),
            LatLng::new(ne.lat.max(p.lat), ne.lng.max(p.lng)),
        )
    }))
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawnRoute {
    pub index: usize,
    pub points: usize,
    pub style: RouteStyle,
}

/// Map without a screen.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    pub markers: Vec<(MarkerKind, LatLng)>,
    pub routes: Vec<DrawnRoute>,
    pub viewport: Option<(LatLng, LatLng)>,
    pub highlighted: Vec<SignalId>,
    pub red_signals: usize,
}

impl MapCanvas for HeadlessMap {
    fn place_marker(&mut self, kind: MarkerKind, at: LatLng) {
        log::info!("{} marker at ({:.5}, {:.5})", kind.label(), at.lat, at.lng);
        self.markers.push((kind, at));
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn draw_route(&mut self, index: usize, path: &[LatLng], style: RouteStyle) {
        self.routes.retain(|r| r.index != index);
        self.routes.push(DrawnRoute {
            index,
            points: path.len(),
            style,
        });
        self.routes.sort_by_key(|r| r.index);
    }

    fn clear_routes(&mut self) {
        self.routes.clear();
    }

    fn fit_bounds(&mut self, path: &[LatLng]) {
        self.viewport = bounds(path);
    }

    fn highlight_signals(&mut self, signals: &[SignalId]) {
        self.highlighted = signals.to_vec();
    }

    fn clear_highlights(&mut self) {
        self.highlighted.clear();
    }

    fn repaint_signals(&mut self, signals: &[Signal]) {
        self.red_signals = signals
            .iter()
            .filter(|s| s.color() == LightColor::Red)
            .count();
        log::debug!(
            "Signals repainted: {} red, {} green",
            self.red_signals,
            signals.len() - self.red_signals
        );
    }
}

/// Text surfaces kept in memory; changes are logged.
#[derive(Debug, Clone)]
pub struct ConsoleDisplay {
    texts: [String; 3],
}

impl Default for ConsoleDisplay {
    fn default() -> Self {
        Self {
            texts: Surface::ALL.map(|s| s.placeholder()),
        }
    }
}

impl ConsoleDisplay {
    fn slot(surface: Surface) -> usize {
        match surface {
            Surface::CurrentEta => 0,
            Surface::Route1 => 1,
            Surface::Route2 => 2,
        }
    }

    pub fn text(&self, surface: Surface) -> &str {
        &self.texts[Self::slot(surface)]
    }
}

impl EtaDisplay for ConsoleDisplay {
    fn set_text(&mut self, surface: Surface, text: &str) {
        let slot = &mut self.texts[Self::slot(surface)];
        if *slot != text {
            log::info!("{:?}: {}", surface, text);
            *slot = text.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_starts_and_resets_to_placeholders() {
        let mut display = ConsoleDisplay::default();
        assert_eq!(display.text(Surface::CurrentEta), "--");
        display.set_text(Surface::Route2, "Route 2: 6.0 min");
        display.reset();
        assert_eq!(display.text(Surface::Route1), "Route 1: --");
        assert_eq!(display.text(Surface::Route2), "Route 2: --");
    }

    #[test]
    fn bounds_cover_the_path() {
        let path = [
            LatLng::new(35.77, -78.65),
            LatLng::new(35.79, -78.63),
            LatLng::new(35.78, -78.66),
        ];
        let (sw, ne) = bounds(&path).unwrap();
        assert_eq!(sw, LatLng::new(35.77, -78.66));
        assert_eq!(ne, LatLng::new(35.79, -78.63));
        assert!(bounds(&[]).is_none());
    }

    #[test]
    fn redrawing_a_route_replaces_it() {
        let mut map = HeadlessMap::default();
        let path = [LatLng::new(0.0, 0.0)];
        map.draw_route(1, &path, RouteStyle::Inactive);
        map.draw_route(0, &path, RouteStyle::Active);
        map.draw_route(1, &path, RouteStyle::Active);
        assert_eq!(map.routes.len(), 2);
        assert_eq!(map.routes[0].index, 0);
        assert_eq!(map.routes[1].style, RouteStyle::Active);
    }
}
