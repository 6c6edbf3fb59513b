use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, trace, warn};

use super::{DistanceProvider, ProviderError};
use crate::config::constant::REQUEST_TIMEOUT_SECS;
use crate::domain::types::Location;

/// OSRM `table` service queried with a two-coordinate table per pair.
#[derive(Debug, Clone)]
pub struct OsrmProvider {
    client: Client,
    base_url: String,
    user_agent: Option<String>,
}

impl OsrmProvider {
    /// `contact_email` goes into the User-Agent sent to the public demo server.
    pub fn new(base_url: String, contact_email: Option<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        // The public demo server rejects requests without a contact User-Agent.
        let user_agent = if base_url.contains("router.project-osrm.org") {
            let agent = contact_email
                .as_deref()
                .map(str::trim)
                .filter(|email| !email.is_empty())
                .map(|email| format!("RouteCraft/0.1 ({})", email))
                .unwrap_or_else(|| "RouteCraft/0.1 (no-email-configured@example.com)".to_string());
            debug!("Using public OSRM with User-Agent: {}", agent);
            Some(agent)
        } else {
            None
        };

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
        })
    }

    fn table_url(&self, origin: Location, destination: Location) -> String {
        format!(
            "{}/{},{};{},{}?annotations=distance",
            self.base_url,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude
        )
    }
}

impl DistanceProvider for OsrmProvider {
    fn name(&self) -> &str {
        "osrm"
    }

    async fn distance(&self, origin: Location, destination: Location) -> Result<f64, ProviderError> {
        let url = self.table_url(origin, destination);
        trace!("Built OSRM URL: {}", url);

        let mut request_builder = self.client.get(&url);
        if let Some(agent) = &self.user_agent {
            request_builder = request_builder.header("User-Agent", agent);
        }

        let response = request_builder.send().await.map_err(|e| {
            if e.to_string().contains("handshake") || e.to_string().contains("TLS") {
                warn!("TLS/handshake failure, likely blocked by public OSRM. Switch to self-hosted.");
            }
            ProviderError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "OSRM returned HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            );
            return Err(ProviderError::new(format!("HTTP {}", status)));
        }

        let json: Value = response.json().await?;
        table_distance(&json)
    }
}

/// Reads `distances[0][1]`. OSRM reports unreachable pairs as `null`.
fn table_distance(json: &Value) -> Result<f64, ProviderError> {
    if let Some(code) = json["code"].as_str() {
        if code != "Ok" {
            return Err(ProviderError::new(format!("OSRM code {}", code)));
        }
    }
    json["distances"][0][1]
        .as_f64()
        .ok_or_else(|| ProviderError::new("no distance in OSRM table"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_uses_lon_lat_order() {
        let provider =
            OsrmProvider::new("http://localhost:5000/table/v1/driving/".to_string(), None).unwrap();
        let url = provider.table_url(Location::new(1.5, 103.0), Location::new(1.25, 104.0));
        assert_eq!(
            url,
            "http://localhost:5000/table/v1/driving/103,1.5;104,1.25?annotations=distance"
        );
        assert!(provider.user_agent.is_none());
    }

    #[test]
    fn public_server_gets_contact_user_agent() {
        let provider = OsrmProvider::new(
            "https://router.project-osrm.org/table/v1/driving".to_string(),
            Some(" ops@example.com ".to_string()),
        )
        .unwrap();
        assert_eq!(provider.user_agent.as_deref(), Some("RouteCraft/0.1 (ops@example.com)"));

        let anonymous = OsrmProvider::new(
            "https://router.project-osrm.org/table/v1/driving".to_string(),
            None,
        )
        .unwrap();
        assert_eq!(
            anonymous.user_agent.as_deref(),
            Some("RouteCraft/0.1 (no-email-configured@example.com)")
        );
    }

    #[test]
    fn reads_off_diagonal_distance() {
        let json: Value =
            serde_json::from_str(r#"{"code": "Ok", "distances": [[0, 812.4], [809.1, 0]]}"#).unwrap();
        assert_eq!(table_distance(&json), Ok(812.4));
    }

    #[test]
    fn unreachable_or_failed_table_is_unavailable() {
        let unreachable: Value =
            serde_json::from_str(r#"{"code": "Ok", "distances": [[0, null], [null, 0]]}"#).unwrap();
        assert!(table_distance(&unreachable).is_err());

        let failed: Value = serde_json::from_str(r#"{"code": "InvalidQuery"}"#).unwrap();
        assert!(table_distance(&failed).is_err());
    }
}
