//! Sensor gateway client for fetching soil readings
//!
//! Talks to the field gateway's ad-hoc JSON endpoint and remaps its
//! abbreviated field names into the shared `SoilReading` shape.

use reqwest::Client;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use shared::SoilReading;

use crate::error::{ClientError, ClientResult};
use crate::poller::ReadingSource;

/// Fractional digits kept on the predicted carbon figure.
const CARBON_DECIMAL_PLACES: u32 = 3;

/// Soil sensor gateway client
#[derive(Clone)]
pub struct SensorClient {
    client: Client,
    base_url: String,
}

/// Gateway response for the soil-data endpoint.
///
/// Field names are the gateway's, not ours; every one is required, so a
/// partial payload fails to deserialize and no partial reading is built.
#[derive(Debug, Deserialize)]
pub struct RawSoilData {
    #[serde(rename = "carbonContent")]
    pub carbon_content: f64,
    #[serde(rename = "pH_H2O")]
    pub ph: f64,
    #[serde(rename = "EC")]
    pub electrical_conductivity: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
    #[serde(rename = "Elev")]
    pub elevation: f64,
}

impl SensorClient {
    /// Create a new SensorClient against a gateway base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// One GET against the gateway, no retries, no caching.
    ///
    /// A non-success status fails without inspecting the body.
    async fn fetch(&self) -> ClientResult<SoilReading> {
        let url = format!("{}/soil-data", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Protocol { status });
        }

        let body = response.text().await.map_err(ClientError::Network)?;
        let raw: RawSoilData =
            serde_json::from_str(&body).map_err(|e| ClientError::Parse(e.to_string()))?;

        convert_raw_reading(raw)
    }
}

impl ReadingSource for SensorClient {
    async fn fetch_reading(&self) -> ClientResult<SoilReading> {
        self.fetch().await
    }
}

/// Convert the gateway payload into the client-side reading shape.
///
/// All fields are copied verbatim except `carbonContent`, which is rounded
/// to three decimals with the midpoint going away from zero.
pub fn convert_raw_reading(raw: RawSoilData) -> ClientResult<SoilReading> {
    Ok(SoilReading {
        carbon_content: decimal_field("carbonContent", raw.carbon_content)?
            .round_dp_with_strategy(CARBON_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
        ph: decimal_field("pH_H2O", raw.ph)?,
        electrical_conductivity: decimal_field("EC", raw.electrical_conductivity)?,
        phosphorus: decimal_field("P", raw.phosphorus)?,
        nitrogen: decimal_field("N", raw.nitrogen)?,
        potassium: decimal_field("K", raw.potassium)?,
        elevation: decimal_field("Elev", raw.elevation)?,
    })
}

fn decimal_field(name: &str, value: f64) -> ClientResult<Decimal> {
    Decimal::from_f64_retain(value)
        .ok_or_else(|| ClientError::Parse(format!("field {name} is not a finite number")))
}
