use std::time::Duration;
use log::debug;
use reqwest::{Client, StatusCode};

use crate::{cmd::telemetry::Telemetry, error::FetchError};

pub struct TelemetrySource {
    client: Client,
    url: String,
}

impl TelemetrySource {
    pub fn new(url: String, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub async fn fetch(&self) -> Result<Telemetry, FetchError> {
        debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        classify(status, &body)
    }
}

/// Turns a finished response into a snapshot or the matching failure.
pub fn classify(status: StatusCode, body: &[u8]) -> Result<Telemetry, FetchError> {
    match status {
        StatusCode::OK => Ok(Telemetry::from_json(body)?),
        StatusCode::UNAUTHORIZED => Err(FetchError::Unauthorized),
        other => Err(FetchError::Status(other.as_u16())),
    }
}
