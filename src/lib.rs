//! Traffic-light ETA simulation.
//!
//! Simulated signals are loaded from a point dataset and advanced on a
//! timer; routes between two clicked points are fetched from a routing
//! service and their ETA is estimated from road classes plus the red lights
//! sitting on each route.

pub mod app;
pub mod config;
pub mod error;
pub mod global_variables;
pub mod monitoring;
pub mod routing;
pub mod session;
pub mod signals;
