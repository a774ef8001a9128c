// routing/mod.rs
pub mod estimator;
pub mod openrouteservice;
pub mod osrm;
pub mod proximity;
pub mod route;
pub mod service;
