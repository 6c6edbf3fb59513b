pub mod fitness;

pub use fitness::{find_demand, find_distance};
