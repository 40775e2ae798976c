//! Shared types and models for the Soil Health Monitor
//!
//! This crate contains types shared between the polling client and the
//! presentation views consuming its state.

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
