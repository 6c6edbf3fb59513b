use crate::distance::matrix::DistanceMatrix;

/// Depot -> first member -> ... -> last member -> depot, visiting members in
/// the given order. Members are positions in the client list.
pub fn find_distance(members: &[usize], dm: &DistanceMatrix) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let warehouse_to_first_loc = dm.from_depot(members[0]);
    let last_loc_to_warehouse = dm.from_depot(members[members.len() - 1]);

    let total_dist: f64 = members
        .windows(2)
        .map(|pair| dm.between(pair[0], pair[1]))
        .sum();

    warehouse_to_first_loc + total_dist + last_loc_to_warehouse
}

/// Saturates at `i64::MAX` instead of wrapping.
pub fn find_demand(members: &[usize], demands: &[i64]) -> i64 {
    members
        .iter()
        .fold(0i64, |total, &m| total.saturating_add(demands[m]))
}
