use std::collections::HashMap;

use futures::stream::{self, StreamExt, TryStreamExt};
use itertools::Itertools;
use tracing::{debug, info, info_span, Instrument};

use super::providers::DistanceProvider;
use crate::domain::types::{Client, ClientId, Location, Node};
use crate::error::RoutingError;
use crate::utils::Cancellation;

/// Symmetric distances between the depot and every client, and between every
/// pair of clients. Node index 0 is the depot, client `p` in the client list
/// is node `p + 1`.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    index: HashMap<ClientId, usize>,
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Zeroed matrix over the depot and the given clients.
    pub(crate) fn new(clients: &[ClientId]) -> Self {
        let size = clients.len() + 1;
        let index = clients
            .iter()
            .enumerate()
            .map(|(pos, id)| (*id, pos + 1))
            .collect();
        Self {
            index,
            data: vec![0.0; size * size],
            size,
        }
    }

    fn node_index(&self, node: Node) -> Option<usize> {
        match node {
            Node::Depot => Some(0),
            Node::Client(id) => self.index.get(&id).copied(),
        }
    }

    /// Writes both orderings of the pair with the same value.
    pub(crate) fn set(&mut self, a: Node, b: Node, distance: f64) {
        if let (Some(i), Some(j)) = (self.node_index(a), self.node_index(b)) {
            self.data[i * self.size + j] = distance;
            self.data[j * self.size + i] = distance;
        }
    }

    pub fn distance(&self, a: Node, b: Node) -> Option<f64> {
        let (i, j) = (self.node_index(a)?, self.node_index(b)?);
        Some(self.data[i * self.size + j])
    }

    /// Depot to the client at position `client` of the client list.
    pub fn from_depot(&self, client: usize) -> f64 {
        self.data[client + 1]
    }

    /// Between the clients at positions `a` and `b` of the client list.
    pub fn between(&self, a: usize, b: usize) -> f64 {
        self.data[(a + 1) * self.size + (b + 1)]
    }

    /// Number of clients covered.
    pub fn client_count(&self) -> usize {
        self.size - 1
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size)
            .tuple_combinations()
            .all(|(i, j)| self.data[i * self.size + j] == self.data[j * self.size + i])
    }
}

/// Every unordered pair the matrix needs: depot to each client, then each
/// client pair in client-list order.
fn required_pairs(depot: Location, clients: &[Client]) -> Vec<(Node, Location, Node, Location)> {
    let depot_pairs = clients
        .iter()
        .map(|c| (Node::Depot, depot, Node::Client(c.id), c.location));
    let client_pairs = clients
        .iter()
        .tuple_combinations()
        .map(|(a, b)| (Node::Client(a.id), a.location, Node::Client(b.id), b.location));
    depot_pairs.chain(client_pairs).collect()
}

/// Queries the provider once per unordered pair, at most `max_concurrent`
/// lookups in flight. The first failed lookup aborts the whole build.
pub async fn build_distance_matrix<P: DistanceProvider>(
    provider: &P,
    depot: Location,
    clients: &[Client],
    max_concurrent: usize,
    cancellation: &Cancellation,
) -> Result<DistanceMatrix, RoutingError> {
    let pairs = required_pairs(depot, clients);
    let pair_count = pairs.len();
    info!(
        "Creating distance matrix using source '{}' ({} clients, {} lookups)",
        provider.name(),
        clients.len(),
        pair_count
    );

    let lookups: Vec<(Node, Node, f64)> = stream::iter(pairs)
        .map(|(from, origin, to, destination)| async move {
            cancellation.check()?;
            let distance = provider
                .distance(origin, destination)
                .await
                .map_err(|e| RoutingError::DistanceUnavailable {
                    from,
                    to,
                    reason: e.reason,
                })?;
            if !distance.is_finite() || distance < 0.0 {
                return Err(RoutingError::DistanceUnavailable {
                    from,
                    to,
                    reason: format!("unusable distance {}", distance),
                });
            }
            debug!("{} -> {}: {:.1}", from, to, distance);
            Ok::<_, RoutingError>((from, to, distance))
        })
        .buffer_unordered(max_concurrent.max(1))
        .try_collect()
        .instrument(info_span!("distance_matrix", lookups = pair_count))
        .await?;

    let ids: Vec<ClientId> = clients.iter().map(|c| c.id).collect();
    let mut matrix = DistanceMatrix::new(&ids);
    for (from, to, distance) in lookups {
        matrix.set(from, to, distance);
    }

    info!("Successfully created {}x{} distance matrix", matrix.size, matrix.size);
    Ok(matrix)
}
