//! Flood API client: sensor series and risk predictions

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::io::HttpClient;
use crate::model::{PredictionKind, PredictionRecord, SensorReading, SourceKind};

/// Client for the flood sensor/prediction API
pub struct FloodApiClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for FloodApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloodApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FloodApiClient {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created FloodApiClient for {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the `count` most recent readings of the given granularity,
    /// oldest first.
    pub async fn fetch_sensor_data(
        &self,
        count: u32,
        source: SourceKind,
    ) -> Result<Vec<SensorReading>, FetchError> {
        let url = format!("{}/{}/{}", self.base_url, source.endpoint(), count);
        let readings: Vec<SensorReading> = self.get_sequence(&url).await?;
        tracing::debug!("Fetched {} {} readings", readings.len(), source);
        Ok(readings)
    }

    /// Fetch the current prediction, which is the last element of the
    /// returned sequence.
    pub async fn fetch_prediction(
        &self,
        kind: PredictionKind,
    ) -> Result<PredictionRecord, FetchError> {
        let url = format!("{}/{}", self.base_url, kind.endpoint());
        let mut records: Vec<PredictionRecord> = self.get_sequence(&url).await?;
        records
            .pop()
            .ok_or_else(|| FetchError::EmptyResult(url.clone()))
    }

    async fn get_sequence<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>, FetchError> {
        let response = self.http.get(url).await?;
        if !response.is_success() {
            return Err(FetchError::Network(format!(
                "GET {} returned status {}",
                url, response.status
            )));
        }

        let items: Vec<T> = serde_json::from_str(&response.body)
            .map_err(|e| FetchError::Parse(format!("GET {}: {}", url, e)))?;
        if items.is_empty() {
            return Err(FetchError::EmptyResult(url.to_string()));
        }
        Ok(items)
    }
}
