//! Common types used across the monitor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SoilReading;

/// Externally observed state of the polling lifecycle.
///
/// Exactly one variant holds at any time. Consumers match exhaustively
/// instead of probing `data`/`error` nullables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadState {
    /// No reading yet; the first attempt is pending or in flight
    Loading,
    /// Most recent attempt failed; any earlier reading is discarded
    Error { message: String },
    /// Most recent attempt succeeded
    Ready {
        reading: SoilReading,
        fetched_at: DateTime<Utc>,
    },
}

impl LoadState {
    /// The reading, if one is currently held.
    pub fn reading(&self) -> Option<&SoilReading> {
        match self {
            LoadState::Ready { reading, .. } => Some(reading),
            LoadState::Loading | LoadState::Error { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error { .. })
    }
}
