use std::env;
use std::error::Error;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;
use tracing::{info, warn};

use crate::domain::types::PlannerOptions;

pub mod constant {
    pub const DEFAULT_VEHICLE_CAPACITY: i64 = 100;
    pub const MAX_CONCURRENT_LOOKUPS: usize = 8;
    pub const DISTANCE_PROVIDER: &str = "google";
    pub const GOOGLE_DISTANCE_MATRIX_URL: &str =
        "https://maps.googleapis.com/maps/api/distancematrix/json";
    pub const OSRM_TABLE_URL: &str = "https://router.project-osrm.org/table/v1/driving";
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const LOCATION_COUNT: usize = 12;
    pub const SEED: u64 = 64;
    pub const ROUTES_CSV_PATH: &str = "routes.csv";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderSource {
    Google,
    Osrm,
    Haversine,
}

impl FromStr for ProviderSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(ProviderSource::Google),
            "osrm" => Ok(ProviderSource::Osrm),
            "haversine" => Ok(ProviderSource::Haversine),
            other => Err(format!("Unknown distance provider '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub vehicle_capacity: i64,
    pub max_concurrent_lookups: usize,
    pub provider: ProviderSource,
    pub google_api_key: Option<String>,
    pub osrm_base_url: String,
    pub osrm_contact_email: Option<String>,
    pub compute_timeout: Option<Duration>,
    pub clients_csv: Option<String>,
    pub routes_csv: String,
}

/// Offline defaults: haversine distances, no API key.
impl Default for Settings {
    fn default() -> Self {
        Self {
            vehicle_capacity: constant::DEFAULT_VEHICLE_CAPACITY,
            max_concurrent_lookups: constant::MAX_CONCURRENT_LOOKUPS,
            provider: ProviderSource::Haversine,
            google_api_key: None,
            osrm_base_url: constant::OSRM_TABLE_URL.to_string(),
            osrm_contact_email: None,
            compute_timeout: None,
            clients_csv: None,
            routes_csv: constant::ROUTES_CSV_PATH.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from `.env` and the process environment.
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        dotenv().ok();

        let provider: ProviderSource = env::var("DISTANCE_PROVIDER")
            .unwrap_or_else(|_| constant::DISTANCE_PROVIDER.to_string())
            .parse()?;

        let google_api_key = env::var("GOOGLE_API_KEY").ok();
        if provider == ProviderSource::Google {
            if google_api_key.is_none() {
                return Err("DISTANCE_PROVIDER is 'google' but GOOGLE_API_KEY is not set".into());
            }
            info!("Loaded Google Maps API key from environment");
        }

        let settings = Settings {
            vehicle_capacity: parse_var("VEHICLE_CAPACITY")?
                .unwrap_or(constant::DEFAULT_VEHICLE_CAPACITY),
            max_concurrent_lookups: parse_var("MAX_CONCURRENT_LOOKUPS")?
                .unwrap_or(constant::MAX_CONCURRENT_LOOKUPS),
            provider,
            google_api_key,
            osrm_base_url: env::var("OSRM_BASE_URL")
                .unwrap_or_else(|_| constant::OSRM_TABLE_URL.to_string()),
            osrm_contact_email: env::var("OSRM_CONTACT_EMAIL").ok(),
            compute_timeout: parse_var::<u64>("COMPUTE_TIMEOUT_SECS")?.map(Duration::from_secs),
            clients_csv: env::var("CLIENTS_CSV").ok(),
            routes_csv: env::var("ROUTES_CSV")
                .unwrap_or_else(|_| constant::ROUTES_CSV_PATH.to_string()),
        };

        if settings.max_concurrent_lookups == 0 {
            warn!("MAX_CONCURRENT_LOOKUPS is 0, lookups will run one at a time");
        }

        Ok(settings)
    }

    pub fn planner_options(&self) -> PlannerOptions {
        PlannerOptions {
            vehicle_capacity: self.vehicle_capacity,
            max_concurrent_lookups: self.max_concurrent_lookups.max(1),
        }
    }
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            vehicle_capacity: constant::DEFAULT_VEHICLE_CAPACITY,
            max_concurrent_lookups: constant::MAX_CONCURRENT_LOOKUPS,
        }
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>, Box<dyn Error>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| format!("Invalid value '{}' for {}: {}", raw, name, e).into()),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_source_parses_case_insensitively() {
        assert_eq!("Google".parse::<ProviderSource>(), Ok(ProviderSource::Google));
        assert_eq!(" osrm ".parse::<ProviderSource>(), Ok(ProviderSource::Osrm));
        assert_eq!(
            "haversine".parse::<ProviderSource>(),
            Ok(ProviderSource::Haversine)
        );
        assert!("bing".parse::<ProviderSource>().is_err());
    }

    #[test]
    fn planner_defaults_to_capacity_of_100() {
        let options = PlannerOptions::default();
        assert_eq!(options.vehicle_capacity, 100);
        assert_eq!(Settings::default().planner_options().vehicle_capacity, 100);
    }

    #[test]
    fn planner_options_never_use_zero_workers() {
        let settings = Settings {
            max_concurrent_lookups: 0,
            ..Settings::default()
        };
        assert_eq!(settings.planner_options().max_concurrent_lookups, 1);
    }
}
