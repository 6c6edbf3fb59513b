pub mod solution;
pub mod types;

pub use solution::RoutePartition;
pub use types::{
    route_label, Client, ClientId, Location, Node, PlannerOptions, Route, RouteRequest,
};
