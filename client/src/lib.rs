//! Soil Health Monitor client
//!
//! The data access adapter ([`external::SensorClient`]) and the polling
//! lifecycle controller ([`poller::Poller`]) behind the terminal views.

pub mod config;
pub mod error;
pub mod external;
pub mod poller;
pub mod views;

pub use config::Config;
