pub mod init;

pub use init::{load_operation, read_operation};
