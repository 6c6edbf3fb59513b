use std::collections::HashSet;

use tracing::{info, info_span, Instrument};

use super::finalize::finalize_routes;
use super::merge::merge_clusters;
use super::ranking::rank_savings;
use crate::distance::matrix::build_distance_matrix;
use crate::distance::providers::DistanceProvider;
use crate::domain::types::{PlannerOptions, Route, RouteRequest};
use crate::error::RoutingError;
use crate::utils::Cancellation;

/// Rejects input the planner can never turn into a valid route list.
pub fn validate_request(request: &RouteRequest, vehicle_capacity: i64) -> Result<(), RoutingError> {
    if vehicle_capacity <= 0 {
        return Err(RoutingError::invalid(format!(
            "vehicle capacity must be positive, got {}",
            vehicle_capacity
        )));
    }
    if request.clients.is_empty() {
        return Err(RoutingError::invalid("no clients to route"));
    }
    if !request.depot.is_valid() {
        return Err(RoutingError::invalid(format!(
            "depot location {} is out of range",
            request.depot.as_lat_lon()
        )));
    }

    let mut seen = HashSet::with_capacity(request.clients.len());
    for client in &request.clients {
        if !seen.insert(client.id) {
            return Err(RoutingError::invalid_client(client.id, "duplicate client id"));
        }
        if !client.location.is_valid() {
            return Err(RoutingError::invalid_client(
                client.id,
                format!("location {} is out of range", client.location.as_lat_lon()),
            ));
        }
        if client.demand < 0 {
            return Err(RoutingError::invalid_client(
                client.id,
                format!("negative demand {}", client.demand),
            ));
        }
        if client.demand > vehicle_capacity {
            return Err(RoutingError::invalid_client(
                client.id,
                format!(
                    "demand {} exceeds vehicle capacity {}",
                    client.demand, vehicle_capacity
                ),
            ));
        }
    }
    Ok(())
}

/// Computes vehicle routes for one depot and its clients.
///
/// Returns either the complete route list or the first failure. Nothing is
/// emitted once cancellation has been observed.
pub async fn compute_routes<P: DistanceProvider>(
    provider: &P,
    request: &RouteRequest,
    options: &PlannerOptions,
    cancellation: &Cancellation,
) -> Result<Vec<Route>, RoutingError> {
    validate_request(request, options.vehicle_capacity)?;
    info!(
        "Computing routes for {} clients, vehicle capacity {}",
        request.clients.len(),
        options.vehicle_capacity
    );

    let matrix = build_distance_matrix(
        provider,
        request.depot,
        &request.clients,
        options.max_concurrent_lookups,
        cancellation,
    )
    .await?;

    let routes = async {
        cancellation.check()?;
        let savings = rank_savings(&matrix);
        let demands: Vec<i64> = request.clients.iter().map(|c| c.demand).collect();
        let partition = merge_clusters(&savings, &demands, options.vehicle_capacity, cancellation)?;

        cancellation.check()?;
        Ok::<_, RoutingError>(finalize_routes(&partition, &matrix, &request.clients))
    }
    .instrument(info_span!("savings"))
    .await?;

    info!(
        "Computed {} routes, total distance {:.1}",
        routes.len(),
        routes.iter().map(|r| r.distance).sum::<f64>()
    );
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Client, ClientId, Location};
    use crate::error::ErrorKind;

    fn request(clients: Vec<Client>) -> RouteRequest {
        RouteRequest {
            depot: Location::new(0.0, 0.0),
            clients,
        }
    }

    fn client(id: u64, demand: i64) -> Client {
        Client::new(id, Location::new(0.0, id as f64 / 100.0), demand)
    }

    #[test]
    fn rejects_empty_and_non_positive_capacity() {
        let err = validate_request(&request(vec![]), 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = validate_request(&request(vec![client(1, 1)]), 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn rejects_bad_clients_with_their_id() {
        let cases = [
            vec![client(1, 10), client(1, 20)],
            vec![client(1, 10), client(2, -5)],
            vec![client(1, 10), client(2, 150)],
            vec![Client::new(2, Location::new(95.0, 0.0), 1)],
        ];
        for clients in cases {
            match validate_request(&request(clients), 100) {
                Err(RoutingError::InvalidInput { client, .. }) => {
                    assert!(client.is_some())
                }
                other => panic!("expected InvalidInput, got {:?}", other),
            }
        }
    }

    #[test]
    fn demand_equal_to_capacity_is_valid() {
        assert!(validate_request(&request(vec![client(1, 100), client(2, 0)]), 100).is_ok());
    }

    #[test]
    fn unsatisfiable_client_is_named() {
        let err = validate_request(&request(vec![client(7, 150)]), 100).unwrap_err();
        assert_eq!(
            err,
            RoutingError::invalid_client(ClientId(7), "demand 150 exceeds vehicle capacity 100")
        );
    }
}
