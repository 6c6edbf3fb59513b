pub mod finalize;
pub mod merge;
pub mod plan;
pub mod ranking;

pub use finalize::finalize_routes;
pub use merge::merge_clusters;
pub use plan::{compute_routes, validate_request};
pub use ranking::{rank_savings, Saving};
