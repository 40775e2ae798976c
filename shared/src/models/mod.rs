//! Domain models for the Soil Health Monitor

mod reading;

pub use reading::*;
