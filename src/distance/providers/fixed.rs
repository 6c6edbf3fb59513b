use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{DistanceProvider, ProviderError};
use crate::domain::types::Location;

type LocationKey = (u64, u64);

fn key(location: Location) -> LocationKey {
    (location.latitude.to_bits(), location.longitude.to_bits())
}

fn pair_key(a: Location, b: Location) -> (LocationKey, LocationKey) {
    let (ka, kb) = (key(a), key(b));
    if ka <= kb {
        (ka, kb)
    } else {
        (kb, ka)
    }
}

/// Caller-supplied symmetric distances, e.g. precomputed by another service.
/// Pairs that were never inserted are unavailable.
#[derive(Debug, Default)]
pub struct FixedProvider {
    distances: HashMap<(LocationKey, LocationKey), f64>,
    calls: AtomicUsize,
}

impl FixedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, a: Location, b: Location, distance: f64) {
        self.distances.insert(pair_key(a, b), distance);
    }

    pub fn with(mut self, a: Location, b: Location, distance: f64) -> Self {
        self.insert(a, b, distance);
        self
    }

    /// Number of lookups served so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl DistanceProvider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn distance(&self, origin: Location, destination: Location) -> Result<f64, ProviderError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.distances
            .get(&pair_key(origin, destination))
            .copied()
            .ok_or_else(|| {
                ProviderError::new(format!(
                    "no distance between {} and {}",
                    origin.as_lat_lon(),
                    destination.as_lat_lon()
                ))
            })
    }
}
