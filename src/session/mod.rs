// session/mod.rs
pub mod controller;
pub mod display;
