use thiserror::Error;

use crate::domain::types::{ClientId, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OperationNotFound,
    DistanceUnavailable,
    InvalidInput,
    Cancelled,
}

/// Failure of a route computation. No partial route list accompanies it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoutingError {
    #[error("Operation {0} not found")]
    OperationNotFound(u64),
    #[error("Distance {from} -> {to} unavailable: {reason}")]
    DistanceUnavailable {
        from: Node,
        to: Node,
        reason: String,
    },
    #[error("Invalid input{}: {}", for_client(.client), .reason)]
    InvalidInput {
        client: Option<ClientId>,
        reason: String,
    },
    #[error("Route computation cancelled")]
    Cancelled,
}

impl RoutingError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        RoutingError::InvalidInput {
            client: None,
            reason: reason.into(),
        }
    }

    pub fn invalid_client(client: ClientId, reason: impl Into<String>) -> Self {
        RoutingError::InvalidInput {
            client: Some(client),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RoutingError::OperationNotFound(_) => ErrorKind::OperationNotFound,
            RoutingError::DistanceUnavailable { .. } => ErrorKind::DistanceUnavailable,
            RoutingError::InvalidInput { .. } => ErrorKind::InvalidInput,
            RoutingError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// The client (or depot) the failure is attributed to, if any.
    pub fn offending(&self) -> Option<Node> {
        match self {
            RoutingError::DistanceUnavailable { from, to, .. } => match from {
                Node::Depot => Some(*to),
                Node::Client(_) => Some(*from),
            },
            RoutingError::InvalidInput { client, .. } => client.map(Node::Client),
            RoutingError::OperationNotFound(_) | RoutingError::Cancelled => None,
        }
    }
}

fn for_client(client: &Option<ClientId>) -> String {
    client.map_or_else(String::new, |c| format!(" for client {}", c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_failure_points_at_client_side_of_pair() {
        let err = RoutingError::DistanceUnavailable {
            from: Node::Depot,
            to: Node::Client(ClientId(4)),
            reason: "no route".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::DistanceUnavailable);
        assert_eq!(err.offending(), Some(Node::Client(ClientId(4))));
        assert_eq!(err.to_string(), "Distance A -> 4 unavailable: no route");
    }

    #[test]
    fn invalid_input_carries_client() {
        let err = RoutingError::invalid_client(ClientId(9), "demand 150 exceeds capacity 100");
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.offending(), Some(Node::Client(ClientId(9))));
        assert_eq!(RoutingError::Cancelled.offending(), None);
        assert_eq!(
            err.to_string(),
            "Invalid input for client 9: demand 150 exceeds capacity 100"
        );
        assert_eq!(
            RoutingError::invalid("no clients").to_string(),
            "Invalid input: no clients"
        );
    }
}
