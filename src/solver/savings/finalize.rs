use std::collections::HashSet;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::distance::matrix::DistanceMatrix;
use crate::domain::solution::RoutePartition;
use crate::domain::types::{Client, Route};
use crate::evaluation::fitness::{find_demand, find_distance};

/// Hands out vehicle numbers starting at 1.
#[derive(Debug)]
struct VehicleCounter(usize);

impl VehicleCounter {
    fn new() -> Self {
        Self(0)
    }

    fn next(&mut self) -> usize {
        self.0 += 1;
        self.0
    }
}

/// Turns the converged partition into vehicle routes.
///
/// Distinct groups come first in discovery order, each visiting its members
/// in merge order. Any client left out of every group then gets its own
/// round trip, in client-list order.
pub fn finalize_routes(
    partition: &RoutePartition,
    matrix: &DistanceMatrix,
    clients: &[Client],
) -> Vec<Route> {
    let demands: Vec<i64> = clients.iter().map(|c| c.demand).collect();

    let groups: Vec<Vec<usize>> = partition
        .discovered_groups()
        .into_iter()
        .filter_map(|g| partition.group(g))
        .map(|group| group.members.iter().copied().unique().collect::<Vec<usize>>())
        .filter(|members| !members.is_empty())
        .collect();

    let costs: Vec<(i64, f64)> = groups
        .par_iter()
        .map(|members| (find_demand(members, &demands), find_distance(members, matrix)))
        .collect();

    let mut vehicles = VehicleCounter::new();
    let mut visited: HashSet<usize> = HashSet::with_capacity(clients.len());
    let mut routes = Vec::with_capacity(groups.len());

    for (members, (capacity, distance)) in groups.into_iter().zip(costs) {
        visited.extend(members.iter().copied());
        let ids = members.iter().map(|&m| clients[m].id).collect();
        let route = Route::new(ids, capacity, distance, vehicles.next());
        debug!(
            "Vehicle {}: {} ({} / {:.1})",
            route.vehicle, route.route, route.capacity, route.distance
        );
        routes.push(route);
    }

    let leftovers: Vec<usize> = (0..clients.len()).filter(|p| !visited.contains(p)).collect();
    if !leftovers.is_empty() {
        warn!("{} clients missing from every group, adding round trips", leftovers.len());
    }
    for pos in leftovers {
        routes.push(round_trip(&clients[pos], pos, matrix, vehicles.next()));
    }

    info!("Finalized {} routes", routes.len());
    routes
}

fn round_trip(client: &Client, pos: usize, matrix: &DistanceMatrix, vehicle: usize) -> Route {
    Route::new(
        vec![client.id],
        client.demand,
        matrix.from_depot(pos) * 2.0,
        vehicle,
    )
}
