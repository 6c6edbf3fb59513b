use std::fmt;

use serde::{Deserialize, Serialize};

/// Label used for the depot in route labels and logs.
pub const DEPOT_LABEL: &str = "A";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// `lat,lon` as expected by the Google distance matrix query string.
    pub fn as_lat_lon(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub location: Location,
    pub demand: i64,
}

impl Client {
    pub fn new(id: u64, location: Location, demand: i64) -> Self {
        Self {
            id: ClientId(id),
            location,
            demand,
        }
    }
}

/// Key of the distance matrix: either the depot or a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Depot,
    Client(ClientId),
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Depot => write!(f, "{}", DEPOT_LABEL),
            Node::Client(id) => write!(f, "{}", id),
        }
    }
}

impl From<ClientId> for Node {
    fn from(id: ClientId) -> Self {
        Node::Client(id)
    }
}

/// Depot plus the clients of a single computation.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub depot: Location,
    pub clients: Vec<Client>,
}

#[derive(Debug, Clone, Copy)]
pub struct PlannerOptions {
    pub vehicle_capacity: i64,
    pub max_concurrent_lookups: usize,
}

/// A finalized vehicle route, visiting `members` in order between two depot visits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub route: String,
    pub members: Vec<ClientId>,
    pub capacity: i64,
    pub distance: f64,
    pub vehicle: usize,
}

impl Route {
    pub fn new(members: Vec<ClientId>, capacity: i64, distance: f64, vehicle: usize) -> Self {
        Self {
            route: route_label(&members),
            members,
            capacity,
            distance,
            vehicle,
        }
    }
}

/// Renders `A-<id>-...-<id>-A`.
pub fn route_label(members: &[ClientId]) -> String {
    std::iter::once(DEPOT_LABEL.to_string())
        .chain(members.iter().map(|id| id.to_string()))
        .chain(std::iter::once(DEPOT_LABEL.to_string()))
        .collect::<Vec<String>>()
        .join("-")
}
