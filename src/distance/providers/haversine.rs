use super::{DistanceProvider, ProviderError};
use crate::domain::types::Location;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in metres. Needs no network, so it backs demos and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineProvider;

impl HaversineProvider {
    pub fn between(origin: Location, destination: Location) -> f64 {
        let (lat1, lat2) = (origin.latitude.to_radians(), destination.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (destination.longitude - origin.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }
}

impl DistanceProvider for HaversineProvider {
    fn name(&self) -> &str {
        "haversine"
    }

    async fn distance(&self, origin: Location, destination: Location) -> Result<f64, ProviderError> {
        Ok(Self::between(origin, destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude() {
        let d = HaversineProvider::between(Location::new(0.0, 0.0), Location::new(1.0, 0.0));
        assert!((d - 111_195.0).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn symmetric_and_zero_on_same_point() {
        let a = Location::new(1.3521, 103.8198);
        let b = Location::new(1.2903, 103.8520);
        assert_eq!(HaversineProvider::between(a, b), HaversineProvider::between(b, a));
        assert_eq!(HaversineProvider::between(a, a), 0.0);
    }
}
