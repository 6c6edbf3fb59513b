use itertools::Itertools;
use tracing::{debug, info};

use crate::distance::matrix::DistanceMatrix;

/// Savings of serving two clients on one route instead of two round trips.
/// `first` and `second` are positions in the client list, `first < second`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saving {
    pub first: usize,
    pub second: usize,
    pub value: f64,
}

/// s(i, j) = d(depot, i) + d(depot, j) - d(i, j)
pub fn saving_between(matrix: &DistanceMatrix, first: usize, second: usize) -> f64 {
    matrix.from_depot(first) + matrix.from_depot(second) - matrix.between(first, second)
}

/// One saving per unordered client pair, highest first.
///
/// Negative savings are kept. Equal values keep their enumeration order
/// (outer loop over the earlier client), so identical input always ranks
/// identically.
pub fn rank_savings(matrix: &DistanceMatrix) -> Vec<Saving> {
    let mut savings: Vec<Saving> = (0..matrix.client_count())
        .tuple_combinations()
        .map(|(first, second)| Saving {
            first,
            second,
            value: saving_between(matrix, first, second),
        })
        .collect();

    // sort_by is stable
    savings.sort_by(|a, b| b.value.total_cmp(&a.value));

    info!("Ranked {} savings", savings.len());
    if let Some(best) = savings.first() {
        debug!(
            "Best saving {:.2} between positions {} and {}",
            best.value, best.first, best.second
        );
    }
    savings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ClientId, Node};

    fn matrix(depot: &[f64], pairs: &[(usize, usize, f64)]) -> DistanceMatrix {
        let ids: Vec<ClientId> = (1..=depot.len() as u64).map(ClientId).collect();
        let mut matrix = DistanceMatrix::new(&ids);
        for (pos, d) in depot.iter().enumerate() {
            matrix.set(Node::Depot, Node::Client(ids[pos]), *d);
        }
        for &(a, b, d) in pairs {
            matrix.set(Node::Client(ids[a]), Node::Client(ids[b]), d);
        }
        matrix
    }

    #[test]
    fn ranks_descending_with_every_pair() {
        let m = matrix(
            &[10.0, 15.0, 20.0],
            &[(0, 1, 5.0), (0, 2, 25.0), (1, 2, 12.0)],
        );
        let savings = rank_savings(&m);

        let order: Vec<(usize, usize, f64)> =
            savings.iter().map(|s| (s.first, s.second, s.value)).collect();
        assert_eq!(order, vec![(1, 2, 23.0), (0, 1, 20.0), (0, 2, 5.0)]);
    }

    #[test]
    fn keeps_negative_savings() {
        let m = matrix(&[1.0, 1.0], &[(0, 1, 5.0)]);
        let savings = rank_savings(&m);
        assert_eq!(savings.len(), 1);
        assert_eq!(savings[0].value, -3.0);
    }

    #[test]
    fn ties_keep_enumeration_order() {
        let m = matrix(
            &[10.0, 10.0, 10.0, 10.0],
            &[
                (0, 1, 4.0),
                (0, 2, 4.0),
                (0, 3, 4.0),
                (1, 2, 4.0),
                (1, 3, 4.0),
                (2, 3, 4.0),
            ],
        );
        let pairs: Vec<(usize, usize)> = rank_savings(&m).iter().map(|s| (s.first, s.second)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn single_client_has_no_savings() {
        let m = matrix(&[7.0], &[]);
        assert!(rank_savings(&m).is_empty());
    }
}
