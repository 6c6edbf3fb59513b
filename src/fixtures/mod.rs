pub mod data_generator;

pub use data_generator::{generate_random_clients, generate_random_inputs, DEFAULT_DEPOT};
