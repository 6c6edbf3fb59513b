pub mod fixed;
pub mod google;
pub mod haversine;
pub mod osrm;

use std::error::Error;

pub use fixed::FixedProvider;
pub use google::GoogleProvider;
pub use haversine::HaversineProvider;
pub use osrm::OsrmProvider;

use crate::config::{ProviderSource, Settings};
use crate::domain::types::Location;

/// The provider could not produce a usable distance for a pair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ProviderError {
    pub reason: String,
}

impl ProviderError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::new(format!("request failed: {}", e))
    }
}

/// Point-to-point travel distance lookup.
#[allow(async_fn_in_trait)]
pub trait DistanceProvider {
    fn name(&self) -> &str;

    async fn distance(&self, origin: Location, destination: Location) -> Result<f64, ProviderError>;
}

/// Provider chosen at runtime from configuration.
#[derive(Debug, Clone)]
pub enum ProviderKind {
    Google(GoogleProvider),
    Osrm(OsrmProvider),
    Haversine(HaversineProvider),
}

impl ProviderKind {
    pub fn from_settings(settings: &Settings) -> Result<Self, Box<dyn Error>> {
        let provider = match settings.provider {
            ProviderSource::Google => {
                let api_key = settings
                    .google_api_key
                    .clone()
                    .ok_or("API key required for Google source")?;
                ProviderKind::Google(GoogleProvider::new(api_key)?)
            }
            ProviderSource::Osrm => ProviderKind::Osrm(OsrmProvider::new(
                settings.osrm_base_url.clone(),
                settings.osrm_contact_email.clone(),
            )?),
            ProviderSource::Haversine => ProviderKind::Haversine(HaversineProvider),
        };
        Ok(provider)
    }
}

impl DistanceProvider for ProviderKind {
    fn name(&self) -> &str {
        match self {
            ProviderKind::Google(p) => p.name(),
            ProviderKind::Osrm(p) => p.name(),
            ProviderKind::Haversine(p) => p.name(),
        }
    }

    async fn distance(&self, origin: Location, destination: Location) -> Result<f64, ProviderError> {
        match self {
            ProviderKind::Google(p) => p.distance(origin, destination).await,
            ProviderKind::Osrm(p) => p.distance(origin, destination).await,
            ProviderKind::Haversine(p) => p.distance(origin, destination).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn google_requires_api_key() {
        let settings = Settings {
            provider: ProviderSource::Google,
            google_api_key: None,
            ..Settings::default()
        };
        assert!(ProviderKind::from_settings(&settings).is_err());
    }

    #[test]
    fn haversine_is_selected_offline() {
        let provider = ProviderKind::from_settings(&Settings::default()).unwrap();
        assert_eq!(provider.name(), "haversine");
    }

    #[test]
    fn osrm_is_built_from_settings() {
        let settings = Settings {
            provider: ProviderSource::Osrm,
            osrm_contact_email: Some("ops@example.com".to_string()),
            ..Settings::default()
        };
        let provider = ProviderKind::from_settings(&settings).unwrap();
        assert_eq!(provider.name(), "osrm");
    }
}
