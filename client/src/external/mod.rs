//! Clients for external services

mod sensor;

pub use sensor::{convert_raw_reading, RawSoilData, SensorClient};
