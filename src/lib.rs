//! Capacity-limited delivery routes from a single depot, built with a
//! greedy savings heuristic over a provider-backed distance matrix.

pub mod config;
pub mod distance;
pub mod domain;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod runner;
pub mod setup;
pub mod solver;
pub mod utils;

pub use distance::{DistanceMatrix, DistanceProvider, ProviderError, ProviderKind};
pub use domain::{Client, ClientId, Location, Node, PlannerOptions, Route, RouteRequest};
pub use error::{ErrorKind, RoutingError};
pub use solver::savings::compute_routes;
pub use utils::Cancellation;
