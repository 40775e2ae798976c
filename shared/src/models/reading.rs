//! Soil sensor reading model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One soil sensor snapshot.
///
/// Only ever constructed from a fully parsed gateway payload; a reading with
/// a subset of its fields does not exist anywhere in the system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoilReading {
    /// Predicted carbon content in percent, 3 fractional digits
    pub carbon_content: Decimal,
    /// pH (H2O method)
    pub ph: Decimal,
    /// Electrical conductivity in µS/cm
    pub electrical_conductivity: Decimal,
    /// Phosphorus in mg/kg
    pub phosphorus: Decimal,
    /// Nitrogen in mg/kg
    pub nitrogen: Decimal,
    /// Potassium in mg/kg
    pub potassium: Decimal,
    /// Elevation in meters
    pub elevation: Decimal,
}
