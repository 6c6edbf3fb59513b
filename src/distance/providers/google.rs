use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{error, trace};

use super::{DistanceProvider, ProviderError};
use crate::config::constant::{GOOGLE_DISTANCE_MATRIX_URL, REQUEST_TIMEOUT_SECS};
use crate::domain::types::Location;

/// Google Distance Matrix API, one origin and one destination per request.
/// Distances are driving metres.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GoogleProvider {
    pub fn new(api_key: String) -> Result<Self, reqwest::Error> {
        Self::with_base_url(GOOGLE_DISTANCE_MATRIX_URL.to_string(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

impl DistanceProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    async fn distance(&self, origin: Location, destination: Location) -> Result<f64, ProviderError> {
        let origins = origin.as_lat_lon();
        let destinations = destination.as_lat_lon();
        trace!("Google distance request {} -> {}", origins, destinations);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("origins", origins.as_str()),
                ("destinations", destinations.as_str()),
                ("mode", "driving"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Google distance matrix returned HTTP {}", status);
            return Err(ProviderError::new(format!("HTTP {}", status)));
        }

        let body = response.json::<DistanceMatrixResponse>().await?;
        first_distance(&body).ok_or_else(|| {
            ProviderError::new(format!(
                "no distance in response (status: {})",
                body.status.as_deref().unwrap_or("missing")
            ))
        })
    }
}

/// Reads `rows[0].elements[0].distance.value`.
fn first_distance(body: &DistanceMatrixResponse) -> Option<f64> {
    let element = body.rows.first()?.elements.first()?;
    element.distance.as_ref().map(|d| d.value)
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: Option<String>,
    #[serde(default)]
    rows: Vec<Row>,
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    distance: Option<Distance>,
}

#[derive(Debug, Deserialize)]
struct Distance {
    value: f64,
}
