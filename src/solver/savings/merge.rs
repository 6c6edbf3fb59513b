use tracing::{debug, info, info_span};

use super::ranking::Saving;
use crate::domain::solution::RoutePartition;
use crate::error::RoutingError;
use crate::utils::Cancellation;

/// Greedy capacity-constrained clustering over the ranked savings.
///
/// Each pass walks the whole savings list from the highest value down and
/// merges the groups of the two clients whenever they are different groups
/// and their combined demand fits `vehicle_capacity`. The group of `first`
/// survives and the group of `second` is appended to it. Merging does not
/// require either client to sit at the end of its group. Passes repeat
/// until one makes no merge.
pub fn merge_clusters(
    savings: &[Saving],
    demands: &[i64],
    vehicle_capacity: i64,
    cancellation: &Cancellation,
) -> Result<RoutePartition, RoutingError> {
    let span = info_span!("merge_clusters", savings = savings.len());
    let _guard = span.enter();

    let mut partition = RoutePartition::singletons(demands);
    let mut pass = 0;

    loop {
        cancellation.check()?;
        pass += 1;

        let merges = merge_pass(&mut partition, savings, vehicle_capacity);
        debug!(
            "Pass {}: {} merges, {} groups left",
            pass,
            merges,
            partition.group_count()
        );

        if merges == 0 {
            break;
        }
    }

    info!(
        "Clustering converged after {} passes with {} groups",
        pass,
        partition.group_count()
    );
    Ok(partition)
}

/// One full walk over the savings list. Returns the number of merges made.
fn merge_pass(partition: &mut RoutePartition, savings: &[Saving], vehicle_capacity: i64) -> usize {
    let mut merges = 0;

    for saving in savings {
        let (Some(keep), Some(absorbed)) = (
            partition.group_index(saving.first),
            partition.group_index(saving.second),
        ) else {
            continue;
        };
        if keep == absorbed {
            continue;
        }

        let (Some(a), Some(b)) = (partition.group(keep), partition.group(absorbed)) else {
            continue;
        };
        let fits = a
            .demand
            .checked_add(b.demand)
            .is_some_and(|combined| combined <= vehicle_capacity);

        if fits && partition.merge(keep, absorbed) {
            merges += 1;
        }
    }

    merges
}
