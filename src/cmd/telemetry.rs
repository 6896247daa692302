use serde::{Deserialize, Serialize};

/// One poll cycle worth of inverter readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    #[serde(rename = "Production_AC_Power_Net_WH")]
    pub production: f64,
    #[serde(rename = "Consumption_AC_Power_Net_WH")]
    pub consumption: f64,
    /// Negative while drawing from the grid.
    #[serde(rename = "Consumption_AC_Power_Meter")]
    pub meter: f64,
    #[serde(rename = "Temperature_C")]
    pub temperature: f64,
}

impl Telemetry {
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }
}
