/// A set of clients currently grouped onto one candidate route.
/// Members are positions into the client list, in visiting order.
#[derive(Debug, Clone)]
pub struct Group {
    pub members: Vec<usize>,
    pub demand: i64,
}

/// Partition of clients into candidate routes.
///
/// Groups live in an arena; every client resolves to its group through
/// `group_of`. A merge repoints each absorbed member to the surviving group,
/// so every client always resolves to the group that currently holds it.
#[derive(Debug, Clone)]
pub struct RoutePartition {
    groups: Vec<Option<Group>>,
    group_of: Vec<Option<usize>>,
}

impl RoutePartition {
    /// One singleton group per client.
    pub fn singletons(demands: &[i64]) -> Self {
        let groups = demands
            .iter()
            .enumerate()
            .map(|(pos, &demand)| {
                Some(Group {
                    members: vec![pos],
                    demand,
                })
            })
            .collect();
        let group_of = (0..demands.len()).map(Some).collect();

        Self { groups, group_of }
    }

    pub fn len(&self) -> usize {
        self.group_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.group_of.is_empty()
    }

    pub fn group_index(&self, client: usize) -> Option<usize> {
        self.group_of.get(client).copied().flatten()
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index).and_then(Option::as_ref)
    }

    /// Number of live groups.
    pub fn group_count(&self) -> usize {
        self.groups.iter().filter(|g| g.is_some()).count()
    }

    /// Appends the members of `absorbed` to `keep` and repoints them.
    /// Returns false when either group is gone or both are the same group.
    pub fn merge(&mut self, keep: usize, absorbed: usize) -> bool {
        if keep == absorbed {
            return false;
        }
        let Some(taken) = self.groups.get_mut(absorbed).and_then(Option::take) else {
            return false;
        };
        let Some(target) = self.groups.get_mut(keep).and_then(Option::as_mut) else {
            self.groups[absorbed] = Some(taken);
            return false;
        };

        for &member in &taken.members {
            self.group_of[member] = Some(keep);
        }
        target.members.extend(taken.members);
        target.demand = target.demand.saturating_add(taken.demand);
        true
    }

    /// Live group indices in the order their first member appears in the client list.
    pub fn discovered_groups(&self) -> Vec<usize> {
        let mut seen = vec![false; self.groups.len()];
        let mut order = Vec::new();
        for group in self.group_of.iter().flatten() {
            if !seen[*group] && self.groups[*group].is_some() {
                seen[*group] = true;
                order.push(*group);
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_one_group_per_client() {
        let partition = RoutePartition::singletons(&[10, 20, 30]);
        assert_eq!(partition.group_count(), 3);
        for client in 0..3 {
            assert_eq!(partition.group_index(client), Some(client));
        }
    }

    #[test]
    fn merge_repoints_every_absorbed_member() {
        let mut partition = RoutePartition::singletons(&[10, 20, 30, 5]);
        assert!(partition.merge(1, 2));
        assert!(partition.merge(0, 1));

        for client in 0..3 {
            assert_eq!(partition.group_index(client), Some(0));
        }
        let group = partition.group(0).unwrap();
        assert_eq!(group.members, vec![0, 1, 2]);
        assert_eq!(group.demand, 60);
        assert!(partition.group(1).is_none());
        assert_eq!(partition.group_count(), 2);
    }

    #[test]
    fn merge_with_self_or_dead_group_is_rejected() {
        let mut partition = RoutePartition::singletons(&[1, 2]);
        assert!(!partition.merge(0, 0));
        assert!(partition.merge(0, 1));
        assert!(!partition.merge(0, 1));
        assert!(!partition.merge(1, 0));
        assert_eq!(partition.group(0).unwrap().members, vec![0, 1]);
    }

    #[test]
    fn discovery_follows_client_order() {
        let mut partition = RoutePartition::singletons(&[1, 1, 1, 1]);
        partition.merge(3, 1);
        assert_eq!(partition.discovered_groups(), vec![0, 3, 2]);
    }
}
