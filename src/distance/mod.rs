pub mod matrix;
pub mod providers;

pub use matrix::{build_distance_matrix, DistanceMatrix};
pub use providers::{DistanceProvider, ProviderError, ProviderKind};
