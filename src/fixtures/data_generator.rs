use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::domain::types::{Client, Location, RouteRequest};

/// Spread of generated clients around the depot, in degrees.
const SPREAD_DEG: f64 = 0.15;

/// Default depot used for generated operations (central Singapore).
pub const DEFAULT_DEPOT: Location = Location {
    latitude: 1.3521,
    longitude: 103.8198,
};

/// Random clients scattered around `depot`, ids `1..=count`, demands in
/// `1..=max_demand`. The same seed always yields the same clients.
pub fn generate_random_clients(
    count: usize,
    depot: Location,
    max_demand: i64,
    seed: u64,
) -> Vec<Client> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (1..=count as u64)
        .map(|id| {
            let location = Location::new(
                (depot.latitude + rng.gen_range(-SPREAD_DEG..SPREAD_DEG)).clamp(-90.0, 90.0),
                (depot.longitude + rng.gen_range(-SPREAD_DEG..SPREAD_DEG)).clamp(-180.0, 180.0),
            );
            let demand = rng.gen_range(1..=max_demand.max(1));
            Client::new(id, location, demand)
        })
        .collect()
}

/// Generate a random operation around the default depot for demo runs.
pub fn generate_random_inputs(count: usize, vehicle_capacity: i64, seed: u64) -> RouteRequest {
    let clients = generate_random_clients(count, DEFAULT_DEPOT, vehicle_capacity / 2, seed);
    let total_demand: i64 = clients.iter().map(|c| c.demand).sum();
    info!(
        "Generated {} clients, total demand {}, vehicle capacity {}",
        clients.len(),
        total_demand,
        vehicle_capacity
    );

    RouteRequest {
        depot: DEFAULT_DEPOT,
        clients,
    }
}
