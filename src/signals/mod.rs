// signals/mod.rs
pub mod dataset;
pub mod random;
pub mod registry;
pub mod traffic_light;
