// monitoring/mod.rs
pub mod eta_log;
